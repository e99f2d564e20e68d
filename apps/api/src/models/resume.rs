use serde::{Deserialize, Serialize};

use crate::models::list::{Identified, ItemId};

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// The canonical resume content edited in a session.
///
/// Every field has a default, so any JSON object (even `{}`) deserializes into a
/// complete, renderable document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeDocument {
    pub personal_info: PersonalInfo,
    pub socials: Socials,
    pub summary: String,
    pub skills: Vec<Skill>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    /// Opaque image data (a `data:` URL). Never interpreted by the editor.
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socials {
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

/// A skill tag. Portable form is the bare name; the id is a session-local handle,
/// so equality compares names only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Skill {
    pub id: ItemId,
    pub name: String,
}

impl Skill {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
        }
    }
}

impl PartialEq for Skill {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl From<String> for Skill {
    fn from(name: String) -> Self {
        Skill::new(name)
    }
}

impl From<Skill> for String {
    fn from(skill: Skill) -> Self {
        skill.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub id: ItemId,
    pub role: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: ItemId,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub id: ItemId,
    pub school: String,
    pub degree: String,
    pub duration: String,
}

impl Identified for Skill {
    fn id(&self) -> ItemId {
        self.id
    }
}

impl Identified for Experience {
    fn id(&self) -> ItemId {
        self.id
    }
}

impl Identified for Project {
    fn id(&self) -> ItemId {
        self.id
    }
}

impl Identified for Education {
    fn id(&self) -> ItemId {
        self.id
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field addressing
// ────────────────────────────────────────────────────────────────────────────

/// A scalar text field of the document, resolved from a `(section, field)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FullName,
    Title,
    Email,
    Phone,
    Location,
    Linkedin,
    Github,
    Website,
    Summary,
}

impl Field {
    /// Resolves the wire names used by the editor forms. Unknown pairs yield `None`.
    pub fn resolve(section: &str, field: &str) -> Option<Field> {
        let resolved = match (section, field) {
            ("personalInfo", "fullName") => Field::FullName,
            ("personalInfo", "title") => Field::Title,
            ("personalInfo", "email") => Field::Email,
            ("personalInfo", "phone") => Field::Phone,
            ("personalInfo", "location") => Field::Location,
            ("socials", "linkedin") => Field::Linkedin,
            ("socials", "github") => Field::Github,
            ("socials", "website") => Field::Website,
            ("summary", _) => Field::Summary,
            _ => return None,
        };
        Some(resolved)
    }
}

/// The ordered sequences of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSection {
    Experience,
    Projects,
    Education,
    Skills,
}

/// A text field of a list entry. Which fields exist depends on the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemField {
    Role,
    Company,
    Duration,
    Description,
    Title,
    School,
    Degree,
    Name,
}

impl ListSection {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "experience" => ListSection::Experience,
            "projects" => ListSection::Projects,
            "education" => ListSection::Education,
            "skills" => ListSection::Skills,
            _ => return None,
        })
    }
}

impl ItemField {
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "role" => ItemField::Role,
            "company" => ItemField::Company,
            "duration" => ItemField::Duration,
            "description" => ItemField::Description,
            "title" => ItemField::Title,
            "school" => ItemField::School,
            "degree" => ItemField::Degree,
            "name" => ItemField::Name,
            _ => return None,
        })
    }
}

pub trait EditableEntry: Identified {
    fn field_mut(&mut self, field: ItemField) -> Option<&mut String>;
}

impl EditableEntry for Skill {
    fn field_mut(&mut self, field: ItemField) -> Option<&mut String> {
        match field {
            ItemField::Name => Some(&mut self.name),
            _ => None,
        }
    }
}

impl EditableEntry for Experience {
    fn field_mut(&mut self, field: ItemField) -> Option<&mut String> {
        match field {
            ItemField::Role => Some(&mut self.role),
            ItemField::Company => Some(&mut self.company),
            ItemField::Duration => Some(&mut self.duration),
            ItemField::Description => Some(&mut self.description),
            _ => None,
        }
    }
}

impl EditableEntry for Project {
    fn field_mut(&mut self, field: ItemField) -> Option<&mut String> {
        match field {
            ItemField::Title => Some(&mut self.title),
            ItemField::Description => Some(&mut self.description),
            _ => None,
        }
    }
}

impl EditableEntry for Education {
    fn field_mut(&mut self, field: ItemField) -> Option<&mut String> {
        match field {
            ItemField::School => Some(&mut self.school),
            ItemField::Degree => Some(&mut self.degree),
            ItemField::Duration => Some(&mut self.duration),
            _ => None,
        }
    }
}

/// A new entry for `add_list_item`. Missing fields are filled with empty strings.
#[derive(Debug, Clone, PartialEq)]
pub enum NewItem {
    Experience(Experience),
    Project(Project),
    Education(Education),
    Skill(Skill),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillInput {
    Plain(String),
    Named { name: String },
}

impl NewItem {
    /// Builds an entry for `section` from a partial JSON body.
    pub fn from_json(
        section: ListSection,
        value: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        Ok(match section {
            ListSection::Experience => NewItem::Experience(serde_json::from_value(value)?),
            ListSection::Projects => NewItem::Project(serde_json::from_value(value)?),
            ListSection::Education => NewItem::Education(serde_json::from_value(value)?),
            ListSection::Skills => {
                let name = match serde_json::from_value::<SkillInput>(value)? {
                    SkillInput::Plain(name) | SkillInput::Named { name } => name,
                };
                NewItem::Skill(Skill::new(name))
            }
        })
    }

    pub fn section(&self) -> ListSection {
        match self {
            NewItem::Experience(_) => ListSection::Experience,
            NewItem::Project(_) => ListSection::Projects,
            NewItem::Education(_) => ListSection::Education,
            NewItem::Skill(_) => ListSection::Skills,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document accessors
// ────────────────────────────────────────────────────────────────────────────

impl ResumeDocument {
    /// The document every session starts from.
    pub fn seed() -> Self {
        Self {
            personal_info: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                title: "Product Designer".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+1 234 567 890".to_string(),
                location: "New York, NY".to_string(),
                photo: None,
            },
            socials: Socials::default(),
            summary: "Creative and detail-oriented Product Designer with 5+ years of experience \
                      in building user-centric digital products."
                .to_string(),
            skills: ["Figma", "User Research", "Prototyping", "HTML/CSS", "React Basic"]
                .into_iter()
                .map(Skill::new)
                .collect(),
            experience: vec![
                Experience {
                    id: ItemId::new(),
                    role: "Senior Designer".to_string(),
                    company: "TechFlow".to_string(),
                    duration: "2022 - Present".to_string(),
                    description: "Led the redesign of the core product dashboard, improving \
                                  user retention by 15%."
                        .to_string(),
                },
                Experience {
                    id: ItemId::new(),
                    role: "UI Designer".to_string(),
                    company: "CreativeStudio".to_string(),
                    duration: "2019 - 2022".to_string(),
                    description: "Designed web and mobile interfaces for fintech clients."
                        .to_string(),
                },
            ],
            projects: vec![Project {
                id: ItemId::new(),
                title: "E-Commerce App".to_string(),
                description: "A mobile application for local artisans.".to_string(),
            }],
            education: vec![Education {
                id: ItemId::new(),
                school: "Parsons School of Design".to_string(),
                degree: "B.A. Interaction Design".to_string(),
                duration: "2015 - 2019".to_string(),
            }],
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FullName => &mut self.personal_info.full_name,
            Field::Title => &mut self.personal_info.title,
            Field::Email => &mut self.personal_info.email,
            Field::Phone => &mut self.personal_info.phone,
            Field::Location => &mut self.personal_info.location,
            Field::Linkedin => &mut self.socials.linkedin,
            Field::Github => &mut self.socials.github,
            Field::Website => &mut self.socials.website,
            Field::Summary => &mut self.summary,
        }
    }

    /// True when a non-blank photo string is stored.
    pub fn has_photo(&self) -> bool {
        self.personal_info
            .photo
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }
}
