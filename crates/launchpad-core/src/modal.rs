/// Panels of the apply view, in increasing stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Panel {
    Primary,
    HowToApply,
    ReportForm,
    SavePrompt,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        match self {
            Panel::Primary => "Scheme",
            Panel::HowToApply => "How to Apply",
            Panel::ReportForm => "Help Us Improve",
            Panel::SavePrompt => "Sign In Required",
        }
    }
}

/// Visibility flags for the apply view.
///
/// The flags are independent, except that nothing nested can be visible
/// without the primary panel: opening a nested panel while the primary is
/// closed is a no-op, and closing the primary clears everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalVisibility {
    primary: bool,
    how_to_apply: bool,
    report_form: bool,
    save_prompt: bool,
    toast: bool,
}

impl ModalVisibility {
    pub fn open_primary(&mut self) {
        self.primary = true;
    }

    pub fn close_primary(&mut self) {
        *self = Self::default();
    }

    /// Returns `false` if the panel could not be opened.
    pub fn open(&mut self, panel: Panel) -> bool {
        if panel == Panel::Primary {
            self.open_primary();
            return true;
        }
        if !self.primary {
            return false;
        }
        *self.flag_mut(panel) = true;
        true
    }

    pub fn close(&mut self, panel: Panel) {
        if panel == Panel::Primary {
            self.close_primary();
        } else {
            *self.flag_mut(panel) = false;
        }
    }

    pub fn show_toast(&mut self) -> bool {
        if self.primary {
            self.toast = true;
        }
        self.toast
    }

    pub fn hide_toast(&mut self) {
        self.toast = false;
    }

    pub fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::Primary => self.primary,
            Panel::HowToApply => self.how_to_apply,
            Panel::ReportForm => self.report_form,
            Panel::SavePrompt => self.save_prompt,
        }
    }

    pub fn primary(&self) -> bool {
        self.primary
    }

    pub fn toast(&self) -> bool {
        self.toast
    }

    pub fn any_nested_open(&self) -> bool {
        self.how_to_apply || self.report_form || self.save_prompt
    }

    /// The visible panel that receives input, if any.
    pub fn topmost(&self) -> Option<Panel> {
        [Panel::SavePrompt, Panel::ReportForm, Panel::HowToApply, Panel::Primary]
            .into_iter()
            .find(|p| self.is_open(*p))
    }

    /// The primary panel captures all input outside itself, unless a nested
    /// panel is up and needs it.
    pub fn blocks_background_interaction(&self) -> bool {
        self.primary && !self.any_nested_open()
    }

    fn flag_mut(&mut self, panel: Panel) -> &mut bool {
        match panel {
            Panel::Primary => &mut self.primary,
            Panel::HowToApply => &mut self.how_to_apply,
            Panel::ReportForm => &mut self.report_form,
            Panel::SavePrompt => &mut self.save_prompt,
        }
    }
}
