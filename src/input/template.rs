//! Template document input.

/// A Handlebars template as last reported by the editor.
#[salsa::input]
pub struct TemplateFile {
    #[returns(ref)]
    pub uri: String,

    #[returns(ref)]
    pub text: String,
}
