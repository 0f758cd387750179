//! Terminal rendering of the chooser page.

use sphere_link_core::presentation::{detail_rows, display_info, error_view, platform_options};
use sphere_link_core::session::{Failure, ReadyState};

pub fn render_ready(ready: &ReadyState) -> String {
    let info = display_info(ready.link.as_ref());
    let mut out = format!("{}\n{}\n", info.title, info.subtitle);

    if let Some(link) = &ready.link {
        out.push('\n');
        for row in detail_rows(link) {
            out.push_str(&format!("  {:<16}{}\n", row.label, row.value));
        }
    }

    out.push('\n');
    for option in platform_options(ready) {
        let marker = if option.enabled { "" } else { "  (unavailable)" };
        out.push_str(&format!(
            "  {:<9}{:<12}{}{}\n",
            option.platform.to_string(),
            option.title,
            option.caption,
            marker
        ));
    }
    out
}

pub fn render_failure(failure: &Failure) -> String {
    let view = error_view(failure);
    format!(
        "{}\n{}\n\n{}: run the command again with a corrected or fresh link\n",
        view.title, view.message, view.action
    )
}
