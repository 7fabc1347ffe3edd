use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::circulation::domain::CirculationService;
use crate::circulation::dto::ExpireHoldsReport;
use crate::core::command::{Command, CommandError};
use crate::holds::dto::HoldDto;

pub(crate) struct ExpireHoldsCommand {
    circulation_service: Arc<dyn CirculationService>,
}

impl ExpireHoldsCommand {
    pub(crate) fn new(circulation_service: Arc<dyn CirculationService>) -> Self {
        Self {
            circulation_service,
        }
    }
}

// dry_run lists the holds the sweep would expire without touching them
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExpireHoldsCommandRequest {
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExpireHoldsCommandResponse {
    pub report: ExpireHoldsReport,
    pub pending: Vec<HoldDto>,
}

#[async_trait]
impl Command<ExpireHoldsCommandRequest, ExpireHoldsCommandResponse> for ExpireHoldsCommand {
    async fn execute(&self, req: ExpireHoldsCommandRequest) -> Result<ExpireHoldsCommandResponse, CommandError> {
        if req.dry_run {
            return self.circulation_service.expired_holds().await
                .map_err(CommandError::from)
                .map(|pending| ExpireHoldsCommandResponse { report: ExpireHoldsReport::default(), pending });
        }
        self.circulation_service.expire_holds().await
            .map_err(CommandError::from)
            .map(|report| ExpireHoldsCommandResponse { report, pending: vec![] })
    }
}
