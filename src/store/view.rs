#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    List,
    Detail,
}

/// Local presentation state. None of it reaches the backend.
#[derive(Debug, Clone)]
pub struct ViewState {
    selected: Option<String>,
    layout: Layout,
    expanded: bool,
    reply_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selected: None,
            layout: Layout::List,
            expanded: true,
            reply_open: false,
        }
    }
}

impl ViewState {
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_reply_open(&self) -> bool {
        self.reply_open
    }

    /// Narrow viewports show either the list or the message, never both.
    pub fn select(&mut self, id: &str, narrow: bool) {
        self.selected = Some(id.to_string());
        self.expanded = true;
        self.reply_open = false;
        if narrow {
            self.layout = Layout::Detail;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.reply_open = false;
        self.layout = Layout::List;
    }

    pub fn back_to_list(&mut self) {
        self.layout = Layout::List;
    }

    pub fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    pub fn toggle_reply(&mut self) -> bool {
        self.reply_open = !self.reply_open;
        self.reply_open
    }
}
