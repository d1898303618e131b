//! Captura service entry point.
//!
//! Wires the capture core to its collaborators based on configuration and
//! serves the webhook and dashboard surfaces.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use captura::adapters::channels::callbell::{
    callbell_webhook_router, CallbellClient, CallbellConfig, CallbellWebhookState,
};
use captura::adapters::channels::whatsapp::{
    whatsapp_webhook_router, SignatureVerifier, WhatsAppClient, WhatsAppConfig,
    WhatsAppWebhookState,
};
use captura::adapters::extraction::{GeminiExtractor, HeuristicExtractor};
use captura::adapters::gemini::{GeminiClient, GeminiConfig};
use captura::adapters::geo::{MapsClient, MapsConfig};
use captura::adapters::http::{api_router, ApiState};
use captura::adapters::photos::{PassthroughPhotoProcessor, VisionConfig, VisionPhotoProcessor};
use captura::adapters::publication::{CrmDestination, CrmPublisher};
use captura::adapters::response::{GeminiResponder, TemplateResponder};
use captura::adapters::store::{spawn_expiry_sweep, InMemoryCaptureStore};
use captura::application::handlers::{
    ApproveCaptureHandler, CaptureQueries, ProcessInboundHandler,
};
use captura::application::AddressLocks;
use captura::config::AppConfig;
use captura::domain::capture::CaptureOrchestrator;
use captura::ports::{
    CaptureStore, FieldExtractor, ListingPublisher, PhotoProcessor, ResponseGenerator,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    info!(environment = ?config.server.environment, "starting captura");

    // Store and expiry sweep.
    let store: Arc<dyn CaptureStore> = Arc::new(InMemoryCaptureStore::new());
    spawn_expiry_sweep(store.clone(), config.capture.sweep_interval());

    // Shared Gemini client, when configured.
    let gemini = config.ai.gemini_api_key.as_ref().filter(|k| !k.is_empty()).map(|key| {
        Arc::new(GeminiClient::new(
            GeminiConfig::new(key.clone())
                .with_model(config.ai.gemini_model.clone())
                .with_timeout(config.ai.timeout()),
        ))
    });

    // Collaborators, each degrading gracefully when unconfigured.
    let extractor: Arc<dyn FieldExtractor> = match &gemini {
        Some(gemini) => Arc::new(GeminiExtractor::new(gemini.clone())),
        None => {
            info!("no gemini key, using the heuristic extractor");
            Arc::new(HeuristicExtractor::new())
        }
    };

    let photos: Arc<dyn PhotoProcessor> = match &config.ai.vision_api_key {
        Some(key) if !key.is_empty() => {
            Arc::new(VisionPhotoProcessor::new(VisionConfig::new(key.clone())))
        }
        _ => {
            info!("no vision key, photos pass through unscreened");
            Arc::new(PassthroughPhotoProcessor::new())
        }
    };

    let responder: Arc<dyn ResponseGenerator> = match &gemini {
        Some(gemini) => Arc::new(GeminiResponder::new(gemini.clone())),
        None => Arc::new(TemplateResponder::new()),
    };

    let destinations = if config.publication.enabled() {
        vec![CrmDestination::new(
            config.publication.crm_name.clone(),
            config.publication.crm_base_url.clone().unwrap_or_default(),
            config.publication.crm_api_key.clone().unwrap_or_default(),
        )]
    } else {
        Vec::new()
    };
    let mut publisher = CrmPublisher::new(destinations);
    if let Some(gemini) = &gemini {
        publisher = publisher.with_gemini(gemini.clone());
    }
    if let Some(key) = config.ai.maps_api_key.as_ref().filter(|k| !k.is_empty()) {
        publisher = publisher.with_maps(Arc::new(MapsClient::new(MapsConfig::new(key.clone()))));
    }
    let publisher: Arc<dyn ListingPublisher> = Arc::new(publisher);

    // Core wiring.
    let orchestrator = Arc::new(
        CaptureOrchestrator::new(extractor, photos, responder, publisher)
            .with_curation(config.capture.curation_policy()),
    );
    let locks = AddressLocks::new();
    let inbound = Arc::new(ProcessInboundHandler::new(
        store.clone(),
        orchestrator.clone(),
        locks.clone(),
    ));
    let approvals = Arc::new(ApproveCaptureHandler::new(
        store.clone(),
        orchestrator.clone(),
        locks,
    ));
    let queries = Arc::new(CaptureQueries::new(store));

    // HTTP surface.
    let mut app = api_router(ApiState { queries, approvals });

    if config.whatsapp.enabled() {
        let client = Arc::new(WhatsAppClient::new(WhatsAppConfig::new(
            config.whatsapp.access_token.clone().unwrap_or_default(),
            config.whatsapp.phone_number_id.clone().unwrap_or_default(),
        )));
        let verifier = config
            .whatsapp
            .app_secret
            .as_ref()
            .map(|secret| Arc::new(SignatureVerifier::new(secret.clone())));
        app = app.merge(whatsapp_webhook_router(WhatsAppWebhookState {
            handler: inbound.clone(),
            client,
            verify_token: config.whatsapp.verify_token.clone(),
            verifier,
        }));
        info!("whatsapp channel enabled");
    }

    if config.callbell.enabled() {
        let client = Arc::new(CallbellClient::new(CallbellConfig::new(
            config.callbell.api_key.clone().unwrap_or_default(),
        )));
        app = app.merge(callbell_webhook_router(CallbellWebhookState {
            handler: inbound.clone(),
            client,
        }));
        info!("callbell channel enabled");
    }

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr();
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if config.is_production() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
