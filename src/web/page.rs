use crate::core::transform::borough_options;
use crate::domain::model::DashboardData;

const TEMPLATE: &str = include_str!("../../assets/dashboard.html");
const OPTIONS_SLOT: &str = "{{BOROUGH_OPTIONS}}";

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// The dashboard page with the borough dropdown filled in server-side.
pub fn render_dashboard(data: &DashboardData) -> String {
    let options: String = borough_options(data.crimes.as_deref())
        .iter()
        .map(|o| {
            format!(
                "      <option value=\"{}\">{}</option>\n",
                escape_html(&o.value),
                escape_html(&o.label)
            )
        })
        .collect();
    TEMPLATE.replace(OPTIONS_SLOT, options.trim_end())
}
