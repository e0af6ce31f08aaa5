use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, KeyboardEvent, MouseEvent};
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::date_utils;
use crate::services::download;
use crate::services::logging::Logger;
use shared::{ChartKind, GenerateChartRequest, RenderedChart};

/// Content of the modal's result pane. Exactly one variant renders at a time.
#[derive(Clone, Debug, PartialEq)]
enum ChartPane {
    Empty,
    Loading,
    Chart(RenderedChart),
    Error(String),
    Warning(String),
    Info(String),
}

#[derive(Properties, PartialEq)]
pub struct ChartModalProps {
    pub is_open: bool,
    pub on_close: Callback<()>,
    pub api_client: ApiClient,
}

#[function_component(ChartModal)]
pub fn chart_modal(props: &ChartModalProps) -> Html {
    let pane = use_state(|| ChartPane::Empty);
    // Single-slot cache: the most recently rendered chart, read by the
    // download action. Survives a close/reopen; the pane does not.
    let current_chart = use_state(|| Option::<RenderedChart>::None);
    let filter_visible = use_state(|| false);
    let practitioner_name = use_state(String::new);
    // Monotonic request generation; a response is applied only if it still
    // carries the latest generation, so a stale response can never overwrite
    // a newer render.
    let request_generation = use_mut_ref(|| 0u64);

    // Reset the result pane and the filter state when the modal opens, and
    // lock page scrolling while it stays open.
    use_effect_with(props.is_open, {
        let pane = pane.clone();
        let filter_visible = filter_visible.clone();
        let practitioner_name = practitioner_name.clone();

        move |is_open| {
            if *is_open {
                pane.set(ChartPane::Empty);
                practitioner_name.set(String::new());
                filter_visible.set(false);
                set_body_scroll_locked(true);
            }
            || set_body_scroll_locked(false)
        }
    });

    // Escape closes the modal. The subscription only exists while the modal
    // is open, so Escape with it closed reaches no listener at all.
    use_effect_with((props.is_open, props.on_close.clone()), {
        move |(is_open, on_close): &(bool, Callback<()>)| {
            let listener = if *is_open {
                let on_close = on_close.clone();
                web_sys::window()
                    .and_then(|w| w.document())
                    .map(|document| {
                        EventListener::new(&document, "keydown", move |event| {
                            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                                if event.key() == "Escape" {
                                    on_close.emit(());
                                }
                            }
                        })
                    })
            } else {
                None
            };

            move || drop(listener)
        }
    });

    let generate = {
        let pane = pane.clone();
        let current_chart = current_chart.clone();
        let api_client = props.api_client.clone();
        let request_generation = request_generation.clone();

        Callback::from(move |(kind, name): (ChartKind, Option<String>)| {
            let pane = pane.clone();
            let current_chart = current_chart.clone();
            let api_client = api_client.clone();
            let request_generation = request_generation.clone();

            let generation = {
                let mut current = request_generation.borrow_mut();
                *current += 1;
                *current
            };

            pane.set(ChartPane::Loading);
            Logger::debug_with_component("chart-modal", &format!("Requesting {} chart", kind));

            let request = GenerateChartRequest::new(kind, name.as_deref());

            spawn_local(async move {
                let result = api_client.generate_chart(request).await;

                if *request_generation.borrow() != generation {
                    Logger::debug_with_component("chart-modal", "Dropping stale chart response");
                    return;
                }

                match result {
                    Ok(response) if response.success => {
                        match response.into_rendered_chart(kind) {
                            Some(chart) => {
                                current_chart.set(Some(chart.clone()));
                                pane.set(ChartPane::Chart(chart));
                            }
                            None => {
                                pane.set(ChartPane::Error(
                                    "Failed to generate the chart: the service returned an incomplete response".to_string(),
                                ));
                            }
                        }
                    }
                    Ok(response) => {
                        let message = response
                            .error
                            .unwrap_or_else(|| "Unknown error".to_string());
                        Logger::warn_with_component(
                            "chart-modal",
                            &format!("Chart generation failed: {}", message),
                        );
                        pane.set(ChartPane::Error(format!(
                            "Failed to generate the chart: {}",
                            message
                        )));
                    }
                    Err(e) => {
                        Logger::error_with_component(
                            "chart-modal",
                            &format!("Chart request failed: {}", e),
                        );
                        pane.set(ChartPane::Error(connection_error_text(&e)));
                    }
                }
            });
        })
    };

    // Selecting a kind drives the filter-section visibility: the section is
    // shown iff the selected kind supports the practitioner filter.
    let on_select_kind = {
        let filter_visible = filter_visible.clone();
        let generate = generate.clone();
        Callback::from(move |kind: ChartKind| {
            filter_visible.set(kind.supports_practitioner_filter());
            generate.emit((kind, None));
        })
    };

    let on_name_change = {
        let practitioner_name = practitioner_name.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            practitioner_name.set(input.value());
        })
    };

    let on_apply_filter = {
        let practitioner_name = practitioner_name.clone();
        let pane = pane.clone();
        let generate = generate.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let name = practitioner_name.trim().to_string();
            if name.is_empty() {
                pane.set(ChartPane::Warning(
                    "Enter a practitioner name to filter the chart.".to_string(),
                ));
            } else {
                generate.emit((ChartKind::AverageHours, Some(name)));
            }
        })
    };

    let on_download = {
        let current_chart = current_chart.clone();
        let pane = pane.clone();
        Callback::from(move |_: MouseEvent| match current_chart.as_ref() {
            Some(chart) => {
                let filename = chart.download_filename(&date_utils::current_iso_date());
                match download::trigger_png_download(&filename, &chart.image) {
                    Ok(()) => {
                        Logger::info_with_component(
                            "chart-modal",
                            &format!("Downloading {}", filename),
                        );
                    }
                    Err(e) => {
                        Logger::error_with_component(
                            "chart-modal",
                            &format!("Download failed: {}", e),
                        );
                        pane.set(ChartPane::Warning(format!(
                            "Could not start the download: {}",
                            e
                        )));
                    }
                }
            }
            None => {
                pane.set(ChartPane::Warning(
                    "There is no chart to download. Generate one first.".to_string(),
                ));
            }
        })
    };

    let on_refresh = {
        let pane = pane.clone();
        Callback::from(move |_: MouseEvent| {
            pane.set(ChartPane::Info(
                "Data refresh is under development. Reload the page to pick up newly loaded files."
                    .to_string(),
            ));
        })
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            on_close.emit(());
        })
    };

    if !props.is_open {
        return html! {};
    }

    let pane_view = match &*pane {
        ChartPane::Empty => html! {},
        ChartPane::Loading => html! {
            <div class="chart-loading">{"📊 Generating chart, please wait..."}</div>
        },
        ChartPane::Chart(chart) => html! {
            <div class="chart-result">
                <h4 class="chart-title">{&chart.title}</h4>
                <img
                    class="chart-image"
                    src={chart.data_url()}
                    alt={chart.title.clone()}
                />
            </div>
        },
        ChartPane::Error(message) => html! {
            <div class="chart-message chart-message-error">{format!("❌ {}", message)}</div>
        },
        ChartPane::Warning(message) => html! {
            <div class="chart-message chart-message-warning">{format!("⚠️ {}", message)}</div>
        },
        ChartPane::Info(message) => html! {
            <div class="chart-message chart-message-info">{format!("🔄 {}", message)}</div>
        },
    };

    html! {
        <div class="chart-modal-backdrop" onclick={on_backdrop_click}>
            <div class="chart-modal" onclick={on_modal_click}>
                <div class="chart-modal-content">
                    <div class="chart-modal-header">
                        <h3 class="chart-modal-title">{"📊 Practicum Charts"}</h3>
                        <button
                            type="button"
                            class="chart-modal-close"
                            onclick={on_close_click}
                        >
                            {"✕"}
                        </button>
                    </div>

                    <div class="chart-kind-buttons">
                        { for ChartKind::all().into_iter().map(|kind| {
                            let on_select_kind = on_select_kind.clone();
                            html! {
                                <button
                                    type="button"
                                    class="btn btn-primary chart-kind-btn"
                                    onclick={Callback::from(move |_: MouseEvent| on_select_kind.emit(kind))}
                                >
                                    {kind.label()}
                                </button>
                            }
                        }) }
                        <button
                            type="button"
                            class="btn btn-secondary refresh-btn"
                            onclick={on_refresh}
                        >
                            {"🔄 Refresh Data"}
                        </button>
                    </div>

                    { if *filter_visible {
                        html! {
                            <form class="practitioner-filter" onsubmit={on_apply_filter}>
                                <label for="practitioner-name" class="form-label">
                                    {"Practitioner name"}
                                </label>
                                <input
                                    id="practitioner-name"
                                    type="text"
                                    class="practitioner-input"
                                    placeholder="Narrow the average-hours chart to one practitioner"
                                    value={(*practitioner_name).clone()}
                                    onchange={on_name_change}
                                />
                                <button type="submit" class="btn btn-primary">{"Filter"}</button>
                            </form>
                        }
                    } else {
                        html! {}
                    } }

                    <div class="chart-container">
                        {pane_view}
                    </div>

                    { if download_visible(&pane) {
                        html! {
                            <button
                                type="button"
                                class="btn btn-primary download-btn"
                                onclick={on_download}
                            >
                                {"⬇️ Download Chart"}
                            </button>
                        }
                    } else {
                        html! {}
                    } }
                </div>
            </div>
        </div>
    }
}

/// The download control accompanies a rendered chart and nothing else.
fn download_visible(pane: &ChartPane) -> bool {
    matches!(pane, ChartPane::Chart(_))
}

/// Error text for transport and server failures, with the operational hint.
fn connection_error_text(error: &str) -> String {
    format!(
        "Connection or server error: {}. Verify that the reporting service is running.",
        error
    )
}

/// Lock or restore page scrolling behind the modal
fn set_body_scroll_locked(locked: bool) {
    if let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    {
        let overflow = if locked { "hidden" } else { "auto" };
        body.style().set_property("overflow", overflow).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_download_only_visible_for_chart_pane() {
        let chart = RenderedChart {
            title: "T".to_string(),
            image: "abc123".to_string(),
            kind: ChartKind::AverageHours,
        };

        assert!(download_visible(&ChartPane::Chart(chart)));

        assert!(!download_visible(&ChartPane::Empty));
        assert!(!download_visible(&ChartPane::Loading));
        assert!(!download_visible(&ChartPane::Error("e".to_string())));
        assert!(!download_visible(&ChartPane::Warning("w".to_string())));
        assert!(!download_visible(&ChartPane::Info("i".to_string())));
    }

    #[wasm_bindgen_test]
    fn test_connection_error_includes_hint() {
        let text = connection_error_text("Server error 500: boom");
        assert!(text.contains("Server error 500: boom"));
        assert!(text.contains("reporting service is running"));
    }
}
