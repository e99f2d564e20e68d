use serde::{Deserialize, Serialize};

/// Which panel the editor shows. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Editor,
    Design,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveSection {
    #[default]
    Personal,
    Socials,
    Summary,
    Experience,
    Projects,
    Education,
    Skills,
}

impl ActiveSection {
    pub const ALL: [ActiveSection; 7] = [
        ActiveSection::Personal,
        ActiveSection::Socials,
        ActiveSection::Summary,
        ActiveSection::Experience,
        ActiveSection::Projects,
        ActiveSection::Education,
        ActiveSection::Skills,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActiveSection::Personal => "personal",
            ActiveSection::Socials => "socials",
            ActiveSection::Summary => "summary",
            ActiveSection::Experience => "experience",
            ActiveSection::Projects => "projects",
            ActiveSection::Education => "education",
            ActiveSection::Skills => "skills",
        }
    }
}

/// `(view, section)`; starts at `(editor, personal)` and only moves on explicit navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub view: ViewMode,
    pub active_section: ActiveSection,
}

impl Navigation {
    /// Returns whether the state changed.
    pub fn navigate(&mut self, view: ViewMode) -> bool {
        let changed = self.view != view;
        self.view = view;
        changed
    }

    /// Selecting a section keeps the current view mode.
    pub fn select_section(&mut self, section: ActiveSection) -> bool {
        let changed = self.active_section != section;
        self.active_section = section;
        changed
    }

    pub fn panel_title(&self) -> &'static str {
        match self.view {
            ViewMode::Design => "Design Studio",
            ViewMode::Editor | ViewMode::Preview => self.active_section.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let nav = Navigation::default();
        assert_eq!(nav.view, ViewMode::Editor);
        assert_eq!(nav.active_section, ActiveSection::Personal);
        assert_eq!(nav.panel_title(), "personal");
    }

    #[test]
    fn test_every_state_reachable_and_revisitable() {
        let mut nav = Navigation::default();
        for view in [ViewMode::Design, ViewMode::Preview, ViewMode::Editor] {
            for section in ActiveSection::ALL {
                nav.navigate(view);
                nav.select_section(section);
                assert_eq!((nav.view, nav.active_section), (view, section));
            }
        }
        assert!(!nav.navigate(ViewMode::Editor));
        assert!(nav.navigate(ViewMode::Design));
        assert_eq!(nav.panel_title(), "Design Studio");
        assert!(nav.navigate(ViewMode::Editor));
        assert_eq!(nav.active_section, ActiveSection::Skills);
    }

    #[test]
    fn test_wire_names() {
        let nav = Navigation {
            view: ViewMode::Preview,
            active_section: ActiveSection::Education,
        };
        let value = serde_json::to_value(nav).unwrap();
        assert_eq!(value["view"], "preview");
        assert_eq!(value["activeSection"], "education");
    }
}
