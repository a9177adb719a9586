// Shader template (embedded for inspection/debugging via get_template()).
const N64_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/shaders/n64_template.wgsl"
));

/// The unfilled WGSL template, placeholders intact
pub fn get_template() -> &'static str {
    N64_TEMPLATE
}
