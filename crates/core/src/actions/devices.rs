use async_trait::async_trait;
use tracing::info;

use super::{numbered, ActionHandler, ActionServices, LISTING_CAP};
use crate::domain::request::ActionRequest;
use crate::domain::result::{ActionResult, ContextOut, BOLD_MARKER};
use crate::errors::ActionError;

pub struct ListDevices;

#[async_trait]
impl ActionHandler for ListDevices {
    fn intent(&self) -> &'static str {
        "listDevices"
    }

    async fn handle(
        &self,
        request: &ActionRequest,
        services: &ActionServices,
    ) -> Result<ActionResult, ActionError> {
        let network = services.network(request)?;
        let name = network.name.trim();
        let devices = services.gateway.list_devices(&network.id).await?;

        let labels: Vec<&str> = devices.iter().take(LISTING_CAP).map(|device| device.label()).collect();
        let mut display = format!(
            "Your network, {BOLD_MARKER}{name}{BOLD_MARKER}, has the following devices:\n{}",
            numbered(&labels).trim()
        );
        let mut spoken = format!("Your network, {name}, has the following devices: {}", labels.join(", ").trim());

        if devices.len() > LISTING_CAP {
            let remaining = devices.len() - LISTING_CAP;
            display.push_str(&format!("\n+ {remaining} other devices."));
            spoken.push_str(&format!(" and {remaining} other devices."));
        }

        info!(
            event_name = "action.list_devices.completed",
            action = self.intent(),
            channel = %request.channel,
            network = %name,
            devices = devices.len(),
            "listed devices"
        );
        Ok(ActionResult::new(display, spoken).with_context(ContextOut::network(name)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ListDevices;
    use crate::actions::{ActionHandler, ActionServices};
    use crate::domain::dashboard::Device;
    use crate::domain::request::{ActionRequest, Channel};
    use crate::errors::{ActionError, GatewayError, UserInputError};
    use crate::fixtures::{sample_directory, GatewayCall, InMemoryGateway, ScriptedResolver};

    fn services(gateway: Arc<InMemoryGateway>) -> ActionServices {
        ActionServices::new(Arc::new(sample_directory()), gateway, Arc::new(ScriptedResolver::default()))
    }

    fn devices(count: usize) -> Vec<Device> {
        (1..=count)
            .map(|index| Device {
                name: (index % 2 == 0).then(|| format!("AP {index}")),
                model: format!("MR{index}"),
                serial: format!("Q2-{index}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn devices_use_name_or_model_and_carry_network_context() {
        let gateway = Arc::new(InMemoryGateway::default().with_devices("N3", devices(3)));
        let request = ActionRequest::new("listDevices", Channel::Slack).parameter("network", " Sandbox 3 ");

        let result = ListDevices.handle(&request, &services(gateway.clone())).await.expect("result");

        assert_eq!(
            result.display_text,
            "Your network, <bold>Sandbox 3<bold>, has the following devices:\n1. MR1\n2. AP 2\n3. MR3"
        );
        assert_eq!(result.spoken_text, "Your network, Sandbox 3, has the following devices: MR1, AP 2, MR3");
        assert_eq!(result.context_out[0].name, "network");
        assert_eq!(result.context_out[0].parameters["network"], "Sandbox 3");
        assert_eq!(gateway.calls(), vec![GatewayCall::ListDevices("N3".to_owned())]);
    }

    #[tokio::test]
    async fn displayed_plus_summarised_equals_total() {
        let gateway = Arc::new(InMemoryGateway::default().with_devices("N1", devices(25)));
        let request = ActionRequest::new("listDevices", Channel::Google).parameter("network", "headquarters");

        let result = ListDevices.handle(&request, &services(gateway)).await.expect("result");

        let listed = result.display_text.lines().filter(|line| line.chars().next().is_some_and(|c| c.is_ascii_digit())).count();
        assert_eq!(listed, 10);
        assert!(result.display_text.ends_with("\n+ 15 other devices."));
        assert!(result.spoken_text.ends_with(" and 15 other devices."));
    }

    #[tokio::test]
    async fn unknown_network_makes_no_remote_call() {
        let gateway = Arc::new(InMemoryGateway::default());
        let request = ActionRequest::new("listDevices", Channel::Slack).parameter("network", "zzzzqqqqxxxx");

        let result = ListDevices.handle(&request, &services(gateway.clone())).await;

        assert_eq!(result, Err(ActionError::Input(UserInputError::NetworkNotFound)));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let gateway = Arc::new(
            InMemoryGateway::default().failing_with(GatewayError::Transport("connection reset".to_owned())),
        );
        let request = ActionRequest::new("listDevices", Channel::Slack).parameter("network", "Warehouse");

        let result = ListDevices.handle(&request, &services(gateway)).await;

        assert!(matches!(result, Err(ActionError::Gateway(GatewayError::Transport(_)))));
    }
}
