const INDEX_TEMPLATE: &str = include_str!("../../assets/index.html");
const INTERVAL_PLACEHOLDER: &str = "__REVEAL_INTERVAL_MS__";

/// The single page, with the reveal interval baked into its script.
pub fn render(reveal_interval_ms: u64) -> String {
    INDEX_TEMPLATE.replace(INTERVAL_PLACEHOLDER, &reveal_interval_ms.max(1).to_string())
}
