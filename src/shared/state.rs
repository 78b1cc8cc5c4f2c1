use std::sync::Arc;

use crate::config::Config;
use crate::modules::geo::resolver::AddressResolver;
use crate::modules::shipping::repository::{MethodRepository, QuoteRepository, ZoneRepository};
use crate::modules::shipping::service::QuoteService;
use crate::shared::clock::Clock;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub method_repo: Arc<dyn MethodRepository>,
    pub zone_repo: Arc<dyn ZoneRepository>,
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub resolver: Arc<AddressResolver>,
    pub clock: Arc<dyn Clock>,
    pub quote_service: Arc<QuoteService>,
}
