//! HTML document: a standalone page for a view model.
//!
//! Produces a self-contained page with embedded CSS carrying every element id
//! of the page contract, the form controls as they currently stand, and the
//! rendered regions.

use crate::render::{Region, escape_html};
use crate::view::ViewModel;

/// Render the whole page.
pub fn render_page(view: &ViewModel, title: &str) -> String {
    let ids = &view.ids;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(CSS_STYLES);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));

    // Form
    html.push_str("<form class=\"analysis-form\" onsubmit=\"return false\">\n");
    html.push_str(&format!(
        "<textarea id=\"{}\" rows=\"8\" maxlength=\"{}\">{}</textarea>\n",
        escape_html(&ids.input_text),
        view.form.max_text_chars,
        escape_html(&view.form.text)
    ));
    html.push_str("<fieldset class=\"methods\">\n<legend>Thinking methods</legend>\n");
    html.push_str(&checkbox(
        &ids.method_all,
        "all",
        "All methods",
        view.form.all_methods,
        false,
    ));
    for method in &view.form.methods {
        html.push_str(&checkbox(
            &ids.method_checkbox(&method.value),
            &method.value,
            &method.label,
            method.checked,
            method.disabled,
        ));
    }
    html.push_str("</fieldset>\n");
    html.push_str(&checkbox(
        &ids.use_ai,
        "use_ai",
        "Enhance with AI",
        view.form.use_ai,
        false,
    ));

    let submit = &view.submit;
    html.push_str(&format!(
        "<button type=\"submit\" id=\"{}\"{}>{}{}</button>\n",
        escape_html(&ids.analyze_button),
        if submit.enabled { "" } else { " disabled" },
        if submit.busy {
            "<span class=\"spinner\"></span> "
        } else {
            ""
        },
        escape_html(&submit.label)
    ));
    html.push_str(&format!(
        "<button type=\"button\" id=\"{}\">Clear</button>\n",
        escape_html(&ids.clear_button)
    ));
    html.push_str("</form>\n");

    html.push_str(&format!(
        "<div id=\"{}\" class=\"loading\"{}>Analyzing text...</div>\n",
        escape_html(&ids.loading),
        hidden(view.loading_visible)
    ));

    // Results
    html.push_str(&format!(
        "<div id=\"{}\" class=\"results\"{}>\n",
        escape_html(&ids.results_container),
        hidden(view.results_visible)
    ));
    let time = view
        .processing_time_ms
        .map(|ms| ms.to_string())
        .unwrap_or_default();
    html.push_str(&format!(
        "<p id=\"{}\" class=\"processing-time\"{}>Processing time: <span id=\"{}\">{}</span> ms</p>\n",
        escape_html(&ids.processing_time),
        hidden(view.processing_time_ms.is_some()),
        escape_html(&ids.time_value),
        time
    ));
    for region in Region::ALL {
        let element = if region == Region::Json { "pre" } else { "div" };
        html.push_str(&format!(
            "<section class=\"region\">\n<h2>{}</h2>\n<{element} id=\"{}\">{}</{element}>\n</section>\n",
            region.title(),
            escape_html(ids.region(region)),
            view.regions.get(region)
        ));
    }
    html.push_str("</div>\n");

    html.push_str("</body>\n</html>\n");
    html
}

fn checkbox(id: &str, value: &str, label: &str, checked: bool, disabled: bool) -> String {
    format!(
        "<label><input type=\"checkbox\" id=\"{}\" value=\"{}\"{}{}> {}</label>\n",
        escape_html(id),
        escape_html(value),
        if checked { " checked" } else { "" },
        if disabled { " disabled" } else { "" },
        escape_html(label)
    )
}

fn hidden(visible: bool) -> &'static str {
    if visible { "" } else { " hidden" }
}

const CSS_STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 960px; margin: 0 auto; padding: 20px; color: #333; }
h1 { border-bottom: 2px solid #333; padding-bottom: 10px; }
textarea { width: 100%; font-family: inherit; }
fieldset.methods { border: 1px solid #ddd; margin: 10px 0; }
label { margin-right: 12px; }
button { padding: 6px 14px; margin: 8px 4px 8px 0; }
.spinner { display: inline-block; width: 10px; height: 10px; border: 2px solid #999; border-top-color: transparent; border-radius: 50%; }
.loading { color: #666; font-style: italic; }
.processing-time { color: #666; font-size: 0.9em; }
.region { margin: 20px 0; }
.concept-badge { display: inline-block; background: #e7f1ff; color: #0d6efd; padding: 4px 10px; border-radius: 12px; margin: 0 6px 6px 0; }
.list-group { list-style: none; padding: 0; }
.list-group-item { border: 1px solid #ddd; padding: 8px 12px; margin-bottom: -1px; }
.mb-3 { margin-bottom: 16px; }
.text-danger { color: #dc3545; }
.text-muted { color: #6c757d; }
pre { background: #f6f8fa; padding: 12px; border-radius: 4px; overflow-x: auto; }
.key { color: #a52a2a; }
.string { color: #008000; }
.number { color: #0000ff; }
.boolean { color: #b22222; }
.null { color: #808080; }
"#;
