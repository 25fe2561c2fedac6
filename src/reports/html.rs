use super::Report;

const STYLE: &str = r#"<style>
    body { font-family: Arial, sans-serif; padding: 20px; background-color: #f4f4f4; }
    .table {
        border-collapse: collapse;
        width: 80%;
        margin: auto;
        background-color: white;
        box-shadow: 0 2px 8px rgba(0,0,0,0.1);
    }
    .table th, .table td {
        border: 1px solid #ddd;
        padding: 8px;
        text-align: left;
    }
    .table th {
        background-color: #4CAF50;
        color: white;
    }
    .table tr:nth-child(even) { background-color: #f2f2f2; }
    .table tr:hover { background-color: #ddd; }
</style>"#;

/// Escape text for use inside HTML element content
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Totals keep their full precision; whole numbers still show one decimal
fn format_total(total: f64) -> String {
    format!("{:?}", total)
}

/// Render a report as a full HTML page
pub fn render_page(report: &Report) -> String {
    let title = escape(report.title);

    let mut table = String::from("<table class=\"table\">\n  <thead>\n    <tr>");
    for header in report.headers {
        table.push_str(&format!("<th>{}</th>", escape(header)));
    }
    table.push_str("</tr>\n  </thead>\n  <tbody>\n");
    for (label, total) in &report.rows {
        table.push_str(&format!(
            "    <tr><td>{}</td><td>{}</td></tr>\n",
            escape(label),
            format_total(*total)
        ));
    }
    table.push_str("  </tbody>\n</table>");

    format!(
        "<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n{STYLE}\n</head>\n<body>\n<h2 style=\"text-align:center;\">{title}</h2>\n{table}\n</body>\n</html>\n"
    )
}

/// Inline error block returned when a report cannot be built
pub fn render_error(message: &str) -> String {
    format!("<h1>Error</h1><p>{}</p>", escape(message))
}
