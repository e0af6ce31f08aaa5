use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

/// Trigger a client-local download of a base64-encoded PNG by clicking a
/// temporary hidden anchor. No server round-trip.
pub fn trigger_png_download(filename: &str, base64_png: &str) -> Result<(), String> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("Document unavailable")?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| "Unable to create anchor")?
        .dyn_into()
        .map_err(|_| "Anchor cast failed")?;
    anchor.set_href(&format!("data:image/png;base64,{}", base64_png));
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    document
        .body()
        .ok_or("Missing body")?
        .append_child(&anchor)
        .ok();
    anchor.click();
    anchor.remove();

    Ok(())
}
