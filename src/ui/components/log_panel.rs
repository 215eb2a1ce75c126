use dioxus::prelude::*;

use crate::domain::entities::log::LogEntry;

#[component]
pub fn LogPanel(entries: Vec<LogEntry>, connected: bool, connection_status: String) -> Element {
    let indicator = if connected { "#22c55e" } else { "#ef4444" };

    rsx! {
        div {
            style: "width: 100%; border: 1px solid #e5e7eb; border-radius: 8px; padding: 16px; background: #f9fafb; text-align: left;",
            div {
                style: "display: flex; align-items: center; justify-content: space-between; margin-bottom: 8px;",
                h3 { style: "font-size: 18px; font-weight: 600; margin: 0;", "Processing Logs" }
                div {
                    style: "display: flex; align-items: center; gap: 6px; font-size: 12px; color: #6b7280;",
                    span { "{connection_status}" }
                    div {
                        title: "{connection_status}",
                        style: "width: 8px; height: 8px; border-radius: 50%; background: {indicator};",
                    }
                }
            }
            div {
                style: "height: 400px; overflow-y: auto; font-family: monospace; font-size: 13px;",
                if entries.is_empty() {
                    p { style: "color: #6b7280; text-align: center;", "Waiting for logs..." }
                } else {
                    {entries.iter().enumerate().map(|(idx, entry)| {
                        let time = entry.short_time();
                        let level = entry.level.as_str().to_uppercase();
                        let color = entry.level.color();
                        let line = entry.display_line();
                        let message = entry.message.clone();
                        rsx!(
                            div {
                                key: "{idx}",
                                title: "{line}",
                                span { style: "color: #9ca3af;", "{time} " }
                                span { style: "color: {color};", "[{level}]" }
                                span { style: "margin-left: 8px;", "{message}" }
                            }
                        )
                    })}
                }
            }
        }
    }
}
