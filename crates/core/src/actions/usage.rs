use async_trait::async_trait;
use tracing::{debug, info};

use super::{time_window, ActionHandler, ActionServices};
use crate::chart::ChartSlice;
use crate::domain::request::{ActionRequest, Channel};
use crate::domain::result::{ActionResult, ContextOut};
use crate::errors::ActionError;
use crate::format::format_bytes;

/// Only the first few devices of a network are sampled for client usage.
pub const SAMPLED_DEVICES: usize = 5;

pub struct DataUsage;

#[derive(Debug, Default)]
struct UsageTotals {
    sent: f64,
    received: f64,
    clients: usize,
}

#[async_trait]
impl ActionHandler for DataUsage {
    fn intent(&self) -> &'static str {
        "dataUsage"
    }

    async fn handle(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        let network = services.network(request)?;
        let window = time_window(request)?;
        let name = network.name.trim();

        let devices = services.gateway.list_devices(&network.id).await?;
        let mut totals = UsageTotals::default();
        let mut slices = Vec::new();
        for device in devices.iter().take(SAMPLED_DEVICES) {
            let clients = services.gateway.list_clients(&device.serial, window.timespan()).await?;
            debug!(
                event_name = "action.data_usage.device_sampled",
                serial = %device.serial,
                clients = clients.len(),
                "sampled device clients"
            );
            for client in &clients {
                totals.sent += client.usage.sent;
                totals.received += client.usage.recv;
                totals.clients += 1;
                slices.push(ChartSlice::new(client.label(), client.usage.total()));
            }
        }

        if totals.clients == 0 {
            return Ok(ActionResult::notice(format!("No data usage in the past {window}!")));
        }

        let total = totals.sent + totals.received;
        let total_text = format_bytes(total);
        let average_text = format_bytes(total / totals.clients as f64);
        let sent_text = format_bytes(totals.sent);
        let received_text = format_bytes(totals.received);
        let clients = totals.clients;

        // Spark markdown only renders consecutive bullets as a list with a blank line between them.
        let gap = if request.channel == Channel::Spark { "\n" } else { "" };
        let display = format!(
            "* Total data usage with {clients} clients over {window}: {total_text}\n{gap}\
             * Average data usage over {window}: {average_text} per client\n{gap}\
             * Total data sent over {window}: {sent_text}\n{gap}\
             * Total data received over {window}: {received_text}"
        );
        let spoken = format!(
            "The total data usage with {clients} clients over {window} was {total_text}. \
             On average, most clients used about {average_text}. \
             The total data sent over the same time period was {sent_text} \
             and the total data received was {received_text}."
        );

        info!(
            event_name = "action.data_usage.completed",
            action = self.intent(),
            channel = %request.channel,
            network = %name,
            clients,
            window_secs = window.total_seconds(),
            "reported data usage"
        );
        Ok(ActionResult::new(display, spoken)
            .with_image(services.charts.pie_chart_url(&slices))
            .with_context(ContextOut::network(name)))
    }
}
