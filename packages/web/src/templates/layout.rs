use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::Theme;

const STYLES: &str = include_str!("../../static/styles.css");

/// Full page shell. `toggle_href` points at the same view in the other theme.
pub fn page(title: &str, theme: Theme, toggle_href: &str, nav: &[(&str, String)], content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="id" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · MagangHub" }
                style { (PreEscaped(STYLES)) }
            }
            body class={ "theme-" (theme.as_str()) } {
                header class="topbar" {
                    nav {
                        @for (label, href) in nav {
                            a href=(href) { (label) }
                        }
                    }
                    a class="theme-toggle" href=(toggle_href) {
                        @match theme {
                            Theme::Dark => "Mode terang",
                            Theme::Light => "Mode gelap",
                        }
                    }
                }
                main {
                    h1 { (title) }
                    (content)
                }
            }
        }
    }
}

pub fn notice(kind: &str, message: &str) -> Markup {
    html! {
        div class={ "notice notice-" (kind) } role="status" { (message) }
    }
}
