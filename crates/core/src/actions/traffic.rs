use async_trait::async_trait;
use tracing::info;

use super::{numbered, time_window, ActionHandler, ActionServices, LISTING_CAP};
use crate::chart::ChartSlice;
use crate::domain::request::ActionRequest;
use crate::domain::result::{ActionResult, ContextOut, BOLD_MARKER};
use crate::errors::{ActionError, UserInputError};
use crate::format::format_duration;

pub const NO_TRAFFIC_REPLY: &str = "No top traffic data has been found!";

pub struct TopTraffic;

#[async_trait]
impl ActionHandler for TopTraffic {
    fn intent(&self) -> &'static str {
        "topTraffic"
    }

    async fn handle(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        let network = services.network(request)?;
        let window = time_window(request)?;
        if !window.within_traffic_range() {
            return Err(UserInputError::TrafficWindowOutOfRange.into());
        }

        let name = network.name.trim();
        let mut entries = services.gateway.traffic(&network.id, window.timespan()).await?;
        if entries.is_empty() {
            return Ok(ActionResult::notice(NO_TRAFFIC_REPLY));
        }

        entries.sort_by(|left, right| right.active_time.total_cmp(&left.active_time));
        entries.truncate(LISTING_CAP);

        let display = format!(
            "Your network, {BOLD_MARKER}{name}{BOLD_MARKER}, has the following top 10 sites/apps for traffic:\n{}",
            numbered(
                entries.iter().map(|entry| format!("{}: {}", entry.label(), format_duration(entry.active_time)))
            )
        );
        let spoken = format!(
            "Your network, {name}, has the following top 10 sites/apps for traffic: {}",
            entries
                .iter()
                .map(|entry| format!("{} used for {}", entry.spoken_label(), format_duration(entry.active_time)))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let slices: Vec<ChartSlice> =
            entries.iter().map(|entry| ChartSlice::new(entry.label(), entry.active_time)).collect();

        info!(
            event_name = "action.top_traffic.completed",
            action = self.intent(),
            channel = %request.channel,
            network = %name,
            window_secs = window.total_seconds(),
            entries = entries.len(),
            "reported top traffic"
        );
        Ok(ActionResult::new(display, spoken)
            .with_image(services.charts.pie_chart_url(&slices))
            .with_context(ContextOut::network(name)))
    }
}
