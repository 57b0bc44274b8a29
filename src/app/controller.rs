use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{GeminiProvider, LogNotifier, MemoryStore, ReqwestTransport, TomlConfigStore};
use crate::app::api::{failure_detail, BrandCraftApi};
use crate::app::gateway::Gateway;
use crate::app::player::AudioPlayer;
use crate::app::session::{AppState, AuthToken};
use crate::domain::audio::decode_base64_pcm;
use crate::domain::branding::{
    ChatMessage, ContentKind, GeneratedBrandName, JsonLogin, SentimentResult, TokenResponse,
};
use crate::domain::prompt::{
    assistant_system_prompt, brand_names_prompt, brand_names_schema, content_prompt,
    inject_context, sentiment_prompt, sentiment_schema,
};
use crate::domain::{AppConfig, BrandContext, DecodedAudio, DomainError};
use crate::infrastructure::init_logging;
use crate::ports::{
    AudioSink, ConfigStore, GenerativeProvider, HttpTransport, KeyValueStore, Notifier,
};

/// Opens the platform audio output on first playback.
pub type AudioOutputFactory =
    Box<dyn Fn() -> Result<Arc<dyn AudioSink>, DomainError> + Send + Sync>;

/// External collaborators the controller is wired to.
pub struct Collaborators {
    pub store: Arc<dyn KeyValueStore>,
    pub transport: Arc<dyn HttpTransport>,
    pub notifier: Arc<dyn Notifier>,
    pub provider: Arc<dyn GenerativeProvider>,
    pub audio_output: AudioOutputFactory,
}

/// Outcome of a sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct SignInOutcome {
    pub display_name: String,
    /// The backend was unreachable and a demo session was issued.
    pub simulated: bool,
}

/// Application controller that wires collaborators together and runs the
/// multi-step flows behind each screen.
pub struct AppController {
    config: RwLock<AppConfig>,
    config_store: Arc<dyn ConfigStore>,
    state: Arc<AppState>,
    api: BrandCraftApi,
    provider: Arc<dyn GenerativeProvider>,
    player: AudioPlayer,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize from the on-disk configuration and the environment.
    ///
    /// The host supplies the session store, the notice surface and the
    /// audio output, which live outside this crate.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        audio_output: AudioOutputFactory,
    ) -> Result<Self, DomainError> {
        let config_store = Arc::new(TomlConfigStore::new()?);

        let mut config = config_store.load()?;
        config.apply_env_overrides();

        let log_guard = init_logging(
            &config_store.logs_dir(),
            &config.logging.level,
            config.logging.file_logging,
            config.logging.max_files,
        )?;

        info!("BrandCraft starting up");

        let collaborators = Collaborators {
            store,
            transport: Arc::new(ReqwestTransport::new()?),
            notifier,
            provider: Arc::new(GeminiProvider::new(config.provider.clone())?),
            audio_output,
        };

        let mut controller = Self::with_parts(config, config_store, collaborators)?;
        controller._log_guard = log_guard;
        Ok(controller)
    }

    /// Initialize without a UI: in-memory session storage and notices
    /// reported through the log.
    pub fn headless(audio_output: AudioOutputFactory) -> Result<Self, DomainError> {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(LogNotifier),
            audio_output,
        )
    }

    /// Build from explicit parts. The session is restored from the store.
    pub fn with_parts(
        config: AppConfig,
        config_store: Arc<dyn ConfigStore>,
        collaborators: Collaborators,
    ) -> Result<Self, DomainError> {
        config.api.validate()?;

        let state = Arc::new(AppState::new(collaborators.store));
        state.restore()?;

        let gateway = Gateway::new(
            config.api.clone(),
            collaborators.transport,
            collaborators.notifier,
            state.clone(),
        );

        info!(
            base_url = %config.api.base_url,
            simulation = config.api.simulation_enabled,
            "AppController initialized"
        );

        Ok(Self {
            config: RwLock::new(config),
            config_store,
            state,
            api: BrandCraftApi::new(Arc::new(gateway)),
            provider: collaborators.provider,
            player: AudioPlayer::new(collaborators.audio_output),
            _log_guard: None,
        })
    }

    pub fn api(&self) -> &BrandCraftApi {
        &self.api
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn player(&self) -> &AudioPlayer {
        &self.player
    }

    // ==================== Auth ====================

    /// JSON login; on success the token and display name are stored and the
    /// email is remembered if asked.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<SignInOutcome, DomainError> {
        let payload = JsonLogin {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.api.json_login(&payload).await?;
        if !response.ok() {
            return Err(DomainError::Validation(failure_detail(
                &response,
                "Invalid credentials",
            )));
        }

        let token: TokenResponse = response.json()?;
        let display_name = token
            .full_name
            .clone()
            .unwrap_or_else(|| payload.email.clone());

        self.state
            .login(AuthToken::new(token.access_token), &display_name)?;
        self.state
            .remember_email(remember.then_some(payload.email.as_str()))?;

        Ok(SignInOutcome {
            display_name,
            simulated: response.is_simulated(),
        })
    }

    pub fn sign_out(&self) -> Result<(), DomainError> {
        self.player.stop();
        self.state.logout()
    }

    // ==================== Brand context ====================

    /// Register the context with the backend and keep it, with its id, as
    /// the active context.
    pub async fn sync_context(&self, mut context: BrandContext) -> Result<BrandContext, DomainError> {
        let created = self.api.create_context(&context).await?;
        context.id = Some(created.context_id);
        self.state.set_context(context.clone())?;
        Ok(context)
    }

    // ==================== Generative provider ====================

    /// Generate marketing copy for the active brand context.
    pub async fn generate_copy(&self, kind: ContentKind) -> Result<String, DomainError> {
        let context = self.state.context();
        let prompt = inject_context(&content_prompt(kind), context.as_ref());
        self.provider.generate_text(&prompt).await
    }

    /// Brand name ideas for the active context. A reply that does not fit
    /// the schema yields no names rather than an error.
    pub async fn suggest_names(&self) -> Result<Vec<GeneratedBrandName>, DomainError> {
        let context = self.state.context();
        let prompt = inject_context(brand_names_prompt(), context.as_ref());
        let value = self
            .provider
            .generate_json(&prompt, &brand_names_schema())
            .await?;

        match serde_json::from_value::<Vec<GeneratedBrandName>>(value) {
            Ok(names) => Ok(names),
            Err(e) => {
                warn!(error = %e, "Discarding malformed brand names");
                Ok(Vec::new())
            }
        }
    }

    /// Score the branding sentiment of a text.
    pub async fn score_sentiment(&self, text: &str) -> Result<SentimentResult, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("Text to analyze is required".to_string()));
        }
        let value = self
            .provider
            .generate_json(&sentiment_prompt(text), &sentiment_schema())
            .await?;
        serde_json::from_value(value)
            .map_err(|e| DomainError::Provider(format!("Sentiment analysis failed: {}", e)))
    }

    /// One assistant turn, personalized with the active context.
    pub async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::Validation("Message is required".to_string()));
        }
        let context = self.state.context();
        let system = assistant_system_prompt(context.as_ref());
        self.provider.chat(&system, history, message).await
    }

    /// Synthesize speech, decode it and start playback.
    pub async fn synthesize_voice(
        &self,
        text: &str,
        voice: Option<&str>,
    ) -> Result<DecodedAudio, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("Script text is required".to_string()));
        }

        let (format, default_voice) = {
            let config = self.config.read();
            (config.audio, config.provider.default_voice.clone())
        };
        let voice = voice.unwrap_or(default_voice.as_str());

        let payload = self.provider.synthesize_speech(text, voice).await?;
        let audio = decode_base64_pcm(&payload, format)?;
        info!(
            voice = voice,
            frames = audio.frame_count(),
            duration_secs = audio.duration_secs(),
            "Speech decoded"
        );

        self.player.play(&audio)?;
        Ok(audio)
    }

    // ==================== Config ====================

    pub fn config(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// Validate, persist and apply a new configuration. The provider key
    /// comes from the environment and is carried over.
    pub fn update_config(&self, mut config: AppConfig) -> Result<(), DomainError> {
        config.api.validate()?;
        config.provider.api_key = self.config.read().provider.api_key.clone();

        self.config_store.save(&config)?;
        self.api.gateway().set_config(config.api.clone());
        *self.config.write() = config;

        info!("Configuration updated");
        Ok(())
    }

    pub fn data_dir(&self) -> String {
        self.config_store.data_dir().to_string_lossy().to_string()
    }

    pub fn logs_dir(&self) -> String {
        self.config_store.logs_dir().to_string_lossy().to_string()
    }

    pub fn config_path(&self) -> String {
        self.config_store.config_path().to_string_lossy().to_string()
    }
}
