mod components;
mod services;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use components::chart_modal::ChartModal;
use services::api::ApiClient;
use services::logging::Logger;

#[function_component(App)]
fn app() -> Html {
    let api_client = ApiClient::new();
    let charts_open = use_state(|| false);

    // Connection status for the footer indicator
    let backend_connected = use_state(|| false);
    let backend_endpoint = use_state(|| String::from("Checking..."));

    // Probe the reporting service once at startup
    use_effect_with((), {
        let api_client = api_client.clone();
        let backend_connected = backend_connected.clone();
        let backend_endpoint = backend_endpoint.clone();

        move |_| {
            spawn_local(async move {
                match api_client.test_connection().await {
                    Ok(_) => {
                        backend_connected.set(true);
                        backend_endpoint.set(api_client.endpoint_description());
                    }
                    Err(e) => {
                        backend_connected.set(false);
                        backend_endpoint.set("Connection failed".to_string());
                        Logger::error_with_component(
                            "app",
                            &format!("Failed to reach the reporting service: {}", e),
                        );
                    }
                }
            });

            || ()
        }
    });

    let open_charts = {
        let charts_open = charts_open.clone();
        Callback::from(move |_: MouseEvent| {
            charts_open.set(true);
        })
    };

    let on_charts_close = {
        let charts_open = charts_open.clone();
        Callback::from(move |_| {
            charts_open.set(false);
        })
    };

    html! {
        <>
            <header class="header">
                <div class="container">
                    <h1>{"Practicum Hours Report"}</h1>
                    <button class="btn btn-primary charts-btn" onclick={open_charts}>
                        {"📊 View Charts"}
                    </button>
                </div>
            </header>

            <main class="main">
                <div class="container">
                    <section class="charts-section">
                        <p>
                            {"Generate server-rendered charts from the loaded practicum \
                              data: average hours per practitioner, hours by area, and \
                              hour distribution by shift."}
                        </p>
                    </section>
                </div>
            </main>

            <ChartModal
                is_open={*charts_open}
                on_close={on_charts_close}
                api_client={api_client.clone()}
            />

            <div class="connection-status">
                {if *backend_connected {
                    format!("Connected to {}", *backend_endpoint)
                } else {
                    (*backend_endpoint).clone()
                }}
            </div>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
