use crate::render::RenderContext;
use handlebars::{handlebars_helper, Handlebars, RenderError, TemplateError};

const INDEX_TEMPLATE: &str = "index";

// Serializes a value for embedding in a <script> block
handlebars_helper!(json_helper: |value: Json| {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
});

/// Page templates, registered once at startup and shared read-only
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Register the embedded page template and its helpers
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_helper("json", Box::new(json_helper));
        registry.register_template_string(INDEX_TEMPLATE, include_str!("./templates/index.hbs"))?;
        Ok(Self { registry })
    }

    /// Render the upload page for the given context
    pub fn render_index(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        self.registry.render(INDEX_TEMPLATE, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::upload::{handle_upload, UploadLimits, UploadedFile};

    fn render(ctx: &RenderContext) -> String {
        Templates::new().unwrap().render_index(ctx).unwrap()
    }

    #[test]
    fn blank_form_has_upload_field() {
        let html = render(&RenderContext::empty());
        assert!(html.contains("name=\"file\""));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(!html.contains("tableData"));
    }

    #[test]
    fn error_is_escaped() {
        let ctx = RenderContext::from_error(&UploadError::Parse("<bad>".to_string()));
        let html = render(&ctx);
        assert!(html.contains("Invalid CSV format: &lt;bad&gt;"));
    }

    #[test]
    fn table_data_is_embedded_as_json() {
        let view = handle_upload(
            &UploadedFile::new("data.csv", "x,y\n1,2\n"),
            &UploadLimits::default(),
        )
        .unwrap();
        let html = render(&RenderContext::from_view(view));
        assert!(html.contains(r#"[{"x":"1","y":"2"}]"#));
        assert!(html.contains(r#"[{"title":"x","field":"x","editor":"input"},{"title":"y","field":"y","editor":"input"}]"#));
        assert!(html.contains("<table border=\"1\""));
    }

    #[test]
    fn embedded_rows_follow_header_order() {
        let view = handle_upload(
            &UploadedFile::new("order.csv", "z,a\n1,2\n"),
            &UploadLimits::default(),
        )
        .unwrap();
        let html = render(&RenderContext::from_view(view));
        assert!(html.contains(r#"[{"z":"1","a":"2"}]"#));
        assert!(html.contains(r#"{"title":"z","field":"z","editor":"input"}"#));
    }

    #[test]
    fn script_close_tags_in_cells_are_neutralised() {
        let view = handle_upload(
            &UploadedFile::new("data.csv", "x\n</script><script>alert(1)\n"),
            &UploadLimits::default(),
        )
        .unwrap();
        let html = render(&RenderContext::from_view(view));
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains(r"<\/script><script>alert(1)"));
    }
}
