//! Pie-chart image URLs rendered on request by an external charting service.

use rand::Rng;

use crate::config::ChartConfig;

const SINGLE_POINT_PREFIX: &str = "chd=t%3A";

#[derive(Clone, Debug, PartialEq)]
pub struct ChartSlice {
    pub label: String,
    pub value: f64,
}

impl ChartSlice {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self { label: label.into(), value }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartBuilder {
    hostname: String,
    width: u32,
    height: u32,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self { hostname: "image-charts.com".to_owned(), width: 700, height: 700 }
    }
}

impl From<&ChartConfig> for ChartBuilder {
    fn from(config: &ChartConfig) -> Self {
        Self { hostname: config.hostname.clone(), width: config.width, height: config.height }
    }
}

impl ChartBuilder {
    pub fn pie_chart_url(&self, slices: &[ChartSlice]) -> String {
        self.pie_chart_url_with(slices, &mut rand::thread_rng())
    }

    /// Each slice gets a random colour drawn from `rng`.
    pub fn pie_chart_url_with<R: Rng>(&self, slices: &[ChartSlice], rng: &mut R) -> String {
        let values: Vec<String> = slices.iter().map(|slice| slice.value.to_string()).collect();
        let labels: Vec<&str> = slices.iter().map(|slice| slice.label.as_str()).collect();
        let colors: Vec<String> =
            slices.iter().map(|_| format!("{:06X}", rng.gen_range(0..=0xFF_FFFFu32))).collect();

        let query = [
            ("cht", "p".to_owned()),
            ("chs", format!("{}x{}", self.width, self.height)),
            ("chd", format!("t:{}", values.join(","))),
            ("chl", labels.join("|")),
            ("chco", colors.join("|")),
        ]
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

        pad_single_point(&format!("https://{}/chart?{query}", self.hostname))
    }
}

/// The chart service rejects a data series holding a single value, so a lone
/// value gets a trailing zero-sized point appended.
fn pad_single_point(url: &str) -> String {
    let Some(start) = url.find(SINGLE_POINT_PREFIX) else {
        return url.to_owned();
    };
    let value_start = start + SINGLE_POINT_PREFIX.len();
    let Some(value_len) = url[value_start..].find('&') else {
        return url.to_owned();
    };
    let value = &url[value_start..value_start + value_len];
    if !is_plain_number(value) {
        return url.to_owned();
    }

    let split = value_start + value_len;
    format!("{}%2C0{}", &url[..split], &url[split..])
}

fn is_plain_number(value: &str) -> bool {
    let mut parts = value.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    !whole.is_empty()
        && whole.chars().all(|c| c.is_ascii_digit())
        && fraction.map_or(true, |digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
