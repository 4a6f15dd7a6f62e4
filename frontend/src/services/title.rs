use shared::TitleSink;

/// Writes guard titles to `document.title`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTitle;

impl TitleSink for DocumentTitle {
    fn set_title(&self, title: &str) {
        gloo::utils::document().set_title(title);
    }
}
