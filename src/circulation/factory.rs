use std::sync::Arc;
use crate::circulation::domain::CirculationService;
use crate::circulation::domain::service::CirculationServiceImpl;
use crate::core::domain::Configuration;
use crate::core::repository::{create_unit_of_work, RepositoryStore};
use crate::gateway::factory::create_publisher;
use crate::holds::domain::HoldQueue;
use crate::holds::factory::create_hold_repository;
use crate::items::factory::create_item_repository;
use crate::loans::factory::create_loan_repository;
use crate::patrons::factory::create_patron_repository;
use crate::rules::factory::create_rule_service;
use crate::utils::date::Clock;

pub(crate) async fn create_circulation_service(config: &Configuration, store: &RepositoryStore,
                                               clock: Arc<dyn Clock>) -> Arc<dyn CirculationService> {
    let item_repo = create_item_repository(store).await;
    let patron_repo = create_patron_repository(store).await;
    let loan_repo = create_loan_repository(store).await;
    let hold_queue = HoldQueue::new(create_hold_repository(store).await, config);
    let rule_service = create_rule_service(store).await;
    let unit_of_work = create_unit_of_work(store).await;
    let publisher = create_publisher(store.gateway_publisher()).await;
    Arc::new(CirculationServiceImpl::new(config, item_repo, patron_repo, loan_repo, rule_service,
                                         hold_queue, unit_of_work, publisher, clock))
}
