//! The editing session: canonical document and configs plus every mutation on them.
//!
//! Mutations never fail. An edit addressing an unknown entry, an unknown field, or a
//! boundary move reports [`MutationOutcome::Noop`] and leaves state untouched. After
//! each applied edit that can change the page, the preview surface is re-rendered so
//! it always reflects the current snapshot.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::editor::navigation::{ActiveSection, Navigation, ViewMode};
use crate::export::portable::PortableSnapshot;
use crate::export::ExportStatus;
use crate::layout::page_fill::{recommend_fill_action, FillAction};
use crate::layout::PageLayout;
use crate::models::design::{DesignConfig, LayoutConfig, Rgb, ACCENT_PALETTE};
use crate::models::list::{move_by_id, remove_by_id, Direction, ItemId};
use crate::models::resume::{
    EditableEntry, Education, Experience, Field, ItemField, ListSection, NewItem, PersonalInfo,
    Project, ResumeDocument, Socials,
};
use crate::render::render;
use crate::scoring::{compute_completeness_report, CompletenessReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationOutcome {
    Applied,
    Noop,
}

impl MutationOutcome {
    fn from_applied(applied: bool) -> Self {
        if applied {
            MutationOutcome::Applied
        } else {
            MutationOutcome::Noop
        }
    }
}

/// One user action against the session.
#[derive(Debug, Clone)]
pub enum Edit {
    /// `section`/`field` are the form's wire names, e.g. `personalInfo`/`fullName`.
    UpdateField {
        section: String,
        field: String,
        value: String,
    },
    UpdateListItem {
        section: ListSection,
        id: ItemId,
        field: ItemField,
        value: String,
    },
    AddListItem(NewItem),
    RemoveListItem {
        section: ListSection,
        id: ItemId,
    },
    MoveListItem {
        section: ListSection,
        id: ItemId,
        direction: Direction,
    },
    /// An already validated `data:` URL.
    SetPhoto(String),
    ClearPhoto,
    SetDesign(DesignConfig),
    SetLayout(LayoutConfig),
    /// Switches view, section or both in one step.
    Navigate {
        view: Option<ViewMode>,
        section: Option<ActiveSection>,
    },
    Import(PortableSnapshot),
}

impl Edit {
    fn name(&self) -> &'static str {
        match self {
            Edit::UpdateField { .. } => "update_field",
            Edit::UpdateListItem { .. } => "update_list_item",
            Edit::AddListItem(_) => "add_list_item",
            Edit::RemoveListItem { .. } => "remove_list_item",
            Edit::MoveListItem { .. } => "move_list_item",
            Edit::SetPhoto(_) => "set_photo",
            Edit::ClearPhoto => "clear_photo",
            Edit::SetDesign(_) => "set_design",
            Edit::SetLayout(_) => "set_layout",
            Edit::Navigate { .. } => "navigate",
            Edit::Import(_) => "import",
        }
    }

    fn changes_page(&self) -> bool {
        !matches!(self, Edit::Navigate { .. })
    }
}

/// Everything the front end needs to draw the editor in one response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(serialize_with = "serialize_with_skill_ids")]
    pub document: ResumeDocument,
    pub design: DesignConfig,
    pub layout: LayoutConfig,
    pub navigation: Navigation,
    pub panel_title: &'static str,
    pub accent_palette: Vec<Rgb>,
    pub score: CompletenessReport,
    /// Typography nudge that would bring the page closer to a good fill.
    pub fill_action: FillAction,
    pub export: ExportStatus,
}

/// The editor's view of the document. Unlike the portable form, skills keep their
/// ids so list edits can address them.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EditableDocument<'a> {
    personal_info: &'a PersonalInfo,
    socials: &'a Socials,
    summary: &'a str,
    skills: Vec<SkillEntry<'a>>,
    experience: &'a [Experience],
    projects: &'a [Project],
    education: &'a [Education],
}

#[derive(Serialize)]
struct SkillEntry<'a> {
    id: ItemId,
    name: &'a str,
}

fn serialize_with_skill_ids<S: Serializer>(
    doc: &ResumeDocument,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    EditableDocument {
        personal_info: &doc.personal_info,
        socials: &doc.socials,
        summary: &doc.summary,
        skills: doc
            .skills
            .iter()
            .map(|skill| SkillEntry {
                id: skill.id,
                name: &skill.name,
            })
            .collect(),
        experience: &doc.experience,
        projects: &doc.projects,
        education: &doc.education,
    }
    .serialize(serializer)
}

pub struct Editor {
    document: ResumeDocument,
    design: DesignConfig,
    layout: LayoutConfig,
    navigation: Navigation,
    preview: Option<Arc<PageLayout>>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// A session over the seed document with default configs.
    pub fn new() -> Self {
        Self::with_document(ResumeDocument::seed())
    }

    pub fn with_document(document: ResumeDocument) -> Self {
        let mut editor = Self {
            document,
            design: DesignConfig::default(),
            layout: LayoutConfig::default(),
            navigation: Navigation::default(),
            preview: None,
        };
        editor.rerender();
        editor
    }

    pub fn document(&self) -> &ResumeDocument {
        &self.document
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout
    }

    pub fn navigation(&self) -> Navigation {
        self.navigation
    }

    /// The surface an export captures. Shared, so an in-flight export keeps the
    /// snapshot it started with while edits continue.
    pub fn preview(&self) -> Option<Arc<PageLayout>> {
        self.preview.clone()
    }

    pub fn score(&self) -> CompletenessReport {
        compute_completeness_report(&self.document)
    }

    pub fn portable(&self) -> PortableSnapshot {
        PortableSnapshot {
            document: self.document.clone(),
            design: Some(self.design.clone()),
            layout: Some(self.layout),
        }
    }

    pub fn snapshot(&self, export: ExportStatus) -> SessionSnapshot {
        SessionSnapshot {
            document: self.document.clone(),
            design: self.design.clone(),
            layout: self.layout,
            navigation: self.navigation,
            panel_title: self.navigation.panel_title(),
            accent_palette: ACCENT_PALETTE.to_vec(),
            score: self.score(),
            fill_action: self
                .preview
                .as_ref()
                .map_or(FillAction::NoAction, |page| {
                    recommend_fill_action(&page.fill, &self.layout)
                }),
            export,
        }
    }

    pub fn apply(&mut self, edit: Edit) -> MutationOutcome {
        let name = edit.name();
        let changes_page = edit.changes_page();
        let applied = match edit {
            Edit::UpdateField {
                section,
                field,
                value,
            } => self.update_field(&section, &field, value),
            Edit::UpdateListItem {
                section,
                id,
                field,
                value,
            } => self.update_list_item(section, id, field, value),
            Edit::AddListItem(item) => self.add_list_item(item),
            Edit::RemoveListItem { section, id } => self.remove_list_item(section, id),
            Edit::MoveListItem {
                section,
                id,
                direction,
            } => self.move_list_item(section, id, direction),
            Edit::SetPhoto(url) => {
                self.document.personal_info.photo = Some(url);
                true
            }
            Edit::ClearPhoto => self.document.personal_info.photo.take().is_some(),
            Edit::SetDesign(design) => {
                self.design = design;
                true
            }
            Edit::SetLayout(layout) => {
                self.layout = layout;
                true
            }
            Edit::Navigate { view, section } => {
                let view_changed = view.is_some_and(|view| self.navigation.navigate(view));
                let section_changed =
                    section.is_some_and(|section| self.navigation.select_section(section));
                view_changed || section_changed
            }
            Edit::Import(snapshot) => {
                self.import(snapshot);
                true
            }
        };

        let outcome = MutationOutcome::from_applied(applied);
        match outcome {
            MutationOutcome::Applied if changes_page => self.rerender(),
            MutationOutcome::Applied => {}
            MutationOutcome::Noop => debug!(edit = name, "edit ignored"),
        }
        outcome
    }

    fn rerender(&mut self) {
        let page = render(&self.document, &self.design, &self.layout);
        self.preview = Some(Arc::new(page));
    }

    // ── Document mutations ───────────────────────────────────────────────

    fn update_field(&mut self, section: &str, field: &str, value: String) -> bool {
        match Field::resolve(section, field) {
            Some(field) => {
                *self.document.field_mut(field) = value;
                true
            }
            None => false,
        }
    }

    fn update_list_item(
        &mut self,
        section: ListSection,
        id: ItemId,
        field: ItemField,
        value: String,
    ) -> bool {
        let doc = &mut self.document;
        match section {
            ListSection::Experience => set_entry_field(&mut doc.experience, id, field, value),
            ListSection::Projects => set_entry_field(&mut doc.projects, id, field, value),
            ListSection::Education => set_entry_field(&mut doc.education, id, field, value),
            ListSection::Skills => set_entry_field(&mut doc.skills, id, field, value),
        }
    }

    /// Appends `item` under a freshly issued id; any id it carried is discarded.
    fn add_list_item(&mut self, item: NewItem) -> bool {
        let doc = &mut self.document;
        match item {
            NewItem::Experience(mut entry) => {
                entry.id = ItemId::new();
                doc.experience.push(entry);
            }
            NewItem::Project(mut entry) => {
                entry.id = ItemId::new();
                doc.projects.push(entry);
            }
            NewItem::Education(mut entry) => {
                entry.id = ItemId::new();
                doc.education.push(entry);
            }
            NewItem::Skill(mut skill) => {
                if skill.name.trim().is_empty() {
                    return false;
                }
                skill.id = ItemId::new();
                doc.skills.push(skill);
            }
        }
        true
    }

    fn remove_list_item(&mut self, section: ListSection, id: ItemId) -> bool {
        let doc = &mut self.document;
        match section {
            ListSection::Experience => remove_by_id(&mut doc.experience, id),
            ListSection::Projects => remove_by_id(&mut doc.projects, id),
            ListSection::Education => remove_by_id(&mut doc.education, id),
            ListSection::Skills => remove_by_id(&mut doc.skills, id),
        }
    }

    fn move_list_item(&mut self, section: ListSection, id: ItemId, direction: Direction) -> bool {
        let doc = &mut self.document;
        match section {
            ListSection::Experience => move_by_id(&mut doc.experience, id, direction),
            ListSection::Projects => move_by_id(&mut doc.projects, id, direction),
            ListSection::Education => move_by_id(&mut doc.education, id, direction),
            ListSection::Skills => move_by_id(&mut doc.skills, id, direction),
        }
    }

    fn import(&mut self, snapshot: PortableSnapshot) {
        self.document = snapshot.document;
        if let Some(design) = snapshot.design {
            self.design = design;
        }
        if let Some(layout) = snapshot.layout {
            self.layout = layout;
        }
    }
}

fn set_entry_field<T: EditableEntry>(
    items: &mut [T],
    id: ItemId,
    field: ItemField,
    value: String,
) -> bool {
    let Some(entry) = items.iter_mut().find(|entry| entry.id() == id) else {
        return false;
    };
    match entry.field_mut(field) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::design::TemplateKind;
    use crate::models::resume::{Experience, Skill};

    fn experience_ids(editor: &Editor) -> Vec<ItemId> {
        editor.document().experience.iter().map(|e| e.id).collect()
    }

    fn roles(editor: &Editor) -> Vec<&str> {
        editor
            .document()
            .experience
            .iter()
            .map(|e| e.role.as_str())
            .collect()
    }

    #[test]
    fn test_session_starts_rendered() {
        let editor = Editor::new();
        let preview = editor.preview().expect("seeded session has a preview");
        assert_eq!(preview.template, TemplateKind::Notion);
        assert_eq!(editor.navigation(), Navigation::default());
    }

    #[test]
    fn test_update_field_and_unknown_field() {
        let mut editor = Editor::new();
        let outcome = editor.apply(Edit::UpdateField {
            section: "personalInfo".into(),
            field: "fullName".into(),
            value: "John Roe".into(),
        });
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(editor.document().personal_info.full_name, "John Roe");
        assert!(editor.preview().unwrap().texts().any(|t| t == "John Roe"));

        let before = editor.document().clone();
        let outcome = editor.apply(Edit::UpdateField {
            section: "personalInfo".into(),
            field: "age".into(),
            value: "40".into(),
        });
        assert_eq!(outcome, MutationOutcome::Noop);
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn test_update_list_item_addresses_by_id() {
        let mut editor = Editor::new();
        let second = editor.document().experience[1].id;
        let outcome = editor.apply(Edit::UpdateListItem {
            section: ListSection::Experience,
            id: second,
            field: ItemField::Company,
            value: "Acme".into(),
        });
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(editor.document().experience[1].company, "Acme");
        assert_eq!(editor.document().experience[0].company, "TechFlow");
    }

    #[test]
    fn test_update_list_item_wrong_field_or_stale_id_is_noop() {
        let mut editor = Editor::new();
        let before = editor.document().clone();
        let project = editor.document().projects[0].id;
        assert_eq!(
            editor.apply(Edit::UpdateListItem {
                section: ListSection::Projects,
                id: project,
                field: ItemField::School,
                value: "x".into(),
            }),
            MutationOutcome::Noop
        );
        assert_eq!(
            editor.apply(Edit::UpdateListItem {
                section: ListSection::Experience,
                id: project,
                field: ItemField::Role,
                value: "x".into(),
            }),
            MutationOutcome::Noop
        );
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn test_add_assigns_fresh_ids() {
        let mut editor = Editor::new();
        let existing = editor.document().experience[0].id;
        let clash = Experience {
            id: existing,
            role: "Intern".into(),
            ..Experience::default()
        };
        editor.apply(Edit::AddListItem(NewItem::Experience(clash)));
        let ids = experience_ids(&editor);
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[2], existing);
        assert_eq!(editor.document().experience[2].company, "");
    }

    #[test]
    fn test_add_blank_skill_is_noop() {
        let mut editor = Editor::new();
        let outcome = editor.apply(Edit::AddListItem(NewItem::Skill(Skill::new("  "))));
        assert_eq!(outcome, MutationOutcome::Noop);
        assert_eq!(editor.document().skills.len(), 5);
        let outcome = editor.apply(Edit::AddListItem(NewItem::Skill(Skill::new("Rust"))));
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(editor.document().skills.last().unwrap().name, "Rust");
    }

    #[test]
    fn test_remove_preserves_order_and_stale_remove_is_noop() {
        let mut editor = Editor::new();
        editor.apply(Edit::AddListItem(NewItem::Experience(Experience {
            role: "Intern".into(),
            ..Experience::default()
        })));
        let middle = editor.document().experience[1].id;
        assert_eq!(
            editor.apply(Edit::RemoveListItem {
                section: ListSection::Experience,
                id: middle,
            }),
            MutationOutcome::Applied
        );
        assert_eq!(roles(&editor), vec!["Senior Designer", "Intern"]);
        assert_eq!(
            editor.apply(Edit::RemoveListItem {
                section: ListSection::Experience,
                id: middle,
            }),
            MutationOutcome::Noop
        );
        assert_eq!(editor.document().experience.len(), 2);
    }

    #[test]
    fn test_moves_at_boundaries_are_noops() {
        let mut editor = Editor::new();
        let ids = experience_ids(&editor);
        let first_up = Edit::MoveListItem {
            section: ListSection::Experience,
            id: ids[0],
            direction: Direction::Up,
        };
        let last_down = Edit::MoveListItem {
            section: ListSection::Experience,
            id: ids[1],
            direction: Direction::Down,
        };
        assert_eq!(editor.apply(first_up), MutationOutcome::Noop);
        assert_eq!(editor.apply(last_down), MutationOutcome::Noop);
        assert_eq!(experience_ids(&editor), ids);

        editor.apply(Edit::MoveListItem {
            section: ListSection::Experience,
            id: ids[1],
            direction: Direction::Up,
        });
        assert_eq!(roles(&editor), vec!["UI Designer", "Senior Designer"]);
    }

    #[test]
    fn test_remove_after_reorder_hits_the_right_entry() {
        let mut editor = Editor::new();
        let ui = editor.document().experience[1].id;
        editor.apply(Edit::MoveListItem {
            section: ListSection::Experience,
            id: ui,
            direction: Direction::Up,
        });
        editor.apply(Edit::RemoveListItem {
            section: ListSection::Experience,
            id: ui,
        });
        assert_eq!(roles(&editor), vec!["Senior Designer"]);
    }

    #[test]
    fn test_photo_set_and_clear() {
        let mut editor = Editor::new();
        assert_eq!(editor.apply(Edit::ClearPhoto), MutationOutcome::Noop);
        let url = "data:image/png;base64,AAAA".to_string();
        editor.apply(Edit::SetPhoto(url.clone()));
        assert_eq!(editor.document().personal_info.photo.as_deref(), Some(url.as_str()));
        assert_eq!(editor.score().score, 100);
        assert_eq!(editor.apply(Edit::ClearPhoto), MutationOutcome::Applied);
        assert!(editor.document().personal_info.photo.is_none());
    }

    #[test]
    fn test_design_change_rerenders_preview() {
        let mut editor = Editor::new();
        let before = editor.preview().unwrap();
        editor.apply(Edit::SetDesign(DesignConfig {
            template: TemplateKind::Modern,
            ..DesignConfig::default()
        }));
        let after = editor.preview().unwrap();
        assert_eq!(after.template, TemplateKind::Modern);
        assert_eq!(before.template, TemplateKind::Notion);
    }

    #[test]
    fn test_navigation_does_not_touch_preview() {
        let mut editor = Editor::new();
        let before = editor.preview().unwrap();
        let design = || Edit::Navigate {
            view: Some(ViewMode::Design),
            section: None,
        };
        assert_eq!(editor.apply(design()), MutationOutcome::Applied);
        assert_eq!(editor.apply(design()), MutationOutcome::Noop);
        assert!(Arc::ptr_eq(&before, &editor.preview().unwrap()));
        assert_eq!(editor.snapshot(ExportStatus::default()).panel_title, "Design Studio");
    }

    #[test]
    fn test_navigate_sets_view_and_section_together() {
        let mut editor = Editor::new();
        let outcome = editor.apply(Edit::Navigate {
            view: Some(ViewMode::Preview),
            section: Some(ActiveSection::Skills),
        });
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(editor.navigation().view, ViewMode::Preview);
        assert_eq!(editor.navigation().active_section, ActiveSection::Skills);

        // Only the section differs, which still counts as a change.
        let outcome = editor.apply(Edit::Navigate {
            view: Some(ViewMode::Preview),
            section: Some(ActiveSection::Education),
        });
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(
            editor.apply(Edit::Navigate {
                view: None,
                section: None
            }),
            MutationOutcome::Noop
        );
    }

    #[test]
    fn test_snapshot_exposes_skill_ids() {
        let editor = Editor::new();
        let value = serde_json::to_value(editor.snapshot(ExportStatus::default())).unwrap();
        let skills = value["document"]["skills"].as_array().unwrap();
        assert_eq!(skills.len(), editor.document().skills.len());
        let first = &editor.document().skills[0];
        assert_eq!(skills[0]["name"], first.name.as_str());
        assert_eq!(skills[0]["id"], first.id.to_string());
        assert_eq!(value["document"]["personalInfo"]["fullName"], "Jane Doe");
    }

    #[test]
    fn test_import_keeps_configs_when_absent() {
        let mut editor = Editor::new();
        editor.apply(Edit::SetLayout(LayoutConfig::new(16.0, 1.2)));
        let snapshot = PortableSnapshot {
            document: ResumeDocument::default(),
            design: None,
            layout: None,
        };
        editor.apply(Edit::Import(snapshot));
        assert_eq!(editor.document(), &ResumeDocument::default());
        assert_eq!(editor.layout(), LayoutConfig::new(16.0, 1.2));
        assert!(editor.preview().unwrap().sections.is_empty());
    }

    #[test]
    fn test_snapshot_score_tracks_document() {
        let mut editor = Editor::new();
        let before = editor.snapshot(ExportStatus::default()).score.score;
        editor.apply(Edit::UpdateField {
            section: "personalInfo".into(),
            field: "email".into(),
            value: String::new(),
        });
        let after = editor.snapshot(ExportStatus::default()).score.score;
        assert_eq!(before - after, 10);
    }
}
