pub mod modules;
pub use modules::admin;
pub use modules::auth;
pub use modules::email;
pub use modules::guestbook;
pub use modules::rsvp;
pub mod api;
pub mod health;
pub mod shared;

use crate::admin::application::use_cases::{
    create_guest::{CreateGuestUseCase, ICreateGuestUseCase},
    export_guests::{ExportGuestsUseCase, IExportGuestsUseCase},
    list_guests::{IListGuestsUseCase, ListGuestsUseCase},
    rsvp_stats::{IRsvpStatsUseCase, RsvpStatsUseCase},
    send_reminder::{ISendReminderUseCase, SendReminderUseCase},
};
use crate::auth::adapter::outgoing::jwt::{JwtSessionService, SessionConfig};
use crate::auth::adapter::outgoing::user_store_postgres::UserStorePostgres;
use crate::auth::application::services::SessionAuthenticator;
use crate::auth::application::use_cases::login_with_qr_token::{
    ILoginWithQrTokenUseCase, LoginWithQrTokenUseCase,
};
use crate::email::adapter::outgoing::email_job_repository_postgres::EmailJobRepositoryPostgres;
use crate::email::adapter::outgoing::smtp_sender::SmtpEmailSender;
use crate::email::application::use_cases::{
    email_history::{EmailHistoryUseCase, IEmailHistoryUseCase},
    enqueue_email::{EnqueueEmailUseCase, IEnqueueEmailUseCase},
    process_email_queue::{IProcessEmailQueueUseCase, ProcessEmailQueueUseCase},
};
use crate::guestbook::adapter::outgoing::guestbook_repository_postgres::GuestbookRepositoryPostgres;
use crate::guestbook::application::use_cases::{
    list_messages::{IListMessagesUseCase, ListMessagesUseCase},
    moderate_message::{IModerateMessageUseCase, ModerateMessageUseCase},
    post_message::{IPostMessageUseCase, PostMessageUseCase},
};
use crate::rsvp::adapter::outgoing::rsvp_repository_postgres::RsvpRepositoryPostgres;
use crate::rsvp::application::orchestrator::rsvp_confirmation::RsvpSubmissionOrchestrator;
use crate::rsvp::application::use_cases::{
    create_rsvp::{CreateRsvpUseCase, ICreateRsvpUseCase},
    edit_rsvp::{EditRsvpUseCase, IEditRsvpUseCase},
    get_rsvp::{GetRsvpUseCase, IGetRsvpUseCase},
};

use actix_web::{web, App, HttpServer};
use sea_orm::{ConnectOptions, Database};
use std::env;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub login_with_qr_token_use_case: Arc<dyn ILoginWithQrTokenUseCase + Send + Sync>,
    pub get_rsvp_use_case: Arc<dyn IGetRsvpUseCase + Send + Sync>,
    pub create_rsvp_use_case: Arc<dyn ICreateRsvpUseCase + Send + Sync>,
    pub edit_rsvp_use_case: Arc<dyn IEditRsvpUseCase + Send + Sync>,
    pub post_message_use_case: Arc<dyn IPostMessageUseCase + Send + Sync>,
    pub list_messages_use_case: Arc<dyn IListMessagesUseCase + Send + Sync>,
    pub moderate_message_use_case: Arc<dyn IModerateMessageUseCase + Send + Sync>,
    pub email_history_use_case: Arc<dyn IEmailHistoryUseCase + Send + Sync>,
    pub process_email_queue_use_case: Arc<dyn IProcessEmailQueueUseCase + Send + Sync>,
    pub send_reminder_use_case: Arc<dyn ISendReminderUseCase + Send + Sync>,
    pub rsvp_stats_use_case: Arc<dyn IRsvpStatsUseCase + Send + Sync>,
    pub create_guest_use_case: Arc<dyn ICreateGuestUseCase + Send + Sync>,
    pub list_guests_use_case: Arc<dyn IListGuestsUseCase + Send + Sync>,
    pub export_guests_use_case: Arc<dyn IExportGuestsUseCase + Send + Sync>,
}

#[actix_web::main]
#[cfg(not(tarpaulin_include))]
async fn start() -> std::io::Result<()> {
    use crate::auth::application::ports::outgoing::{TokenProvider, UserQuery};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting application...");

    // Environment variable loading
    let env = std::env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());

    // Try .env.{environment} first, then fall back to .env
    let env_file = format!(".env.{}", env);
    if dotenvy::from_filename(&env_file).is_err() {
        dotenvy::dotenv().ok();
    }

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL is not set in .env file");
    let host = env::var("HOST").expect("HOST is not set in .env file");
    let port = env::var("PORT").expect("PORT is not set in .env file");

    // SMTP setup
    let from_email = std::env::var("EMAIL_FROM").expect("EMAIL_FROM not set");
    let smtp_sender = if env != "production" {
        // Local Mailpit
        let smtp_host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let smtp_port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .expect("Invalid SMTP_PORT");

        SmtpEmailSender::new_local(&smtp_host, smtp_port, &from_email)
    } else {
        let smtp_server = std::env::var("SMTP_SERVER").expect("SMTP_SERVER not set");
        let smtp_user = std::env::var("SMTP_USERNAME").expect("SMTP_USERNAME not set");
        let smtp_pass = std::env::var("SMTP_PASSWORD").expect("SMTP_PASSWORD not set");

        SmtpEmailSender::new(&smtp_server, &smtp_user, &smtp_pass, &from_email)
            .expect("Invalid SMTP_SERVER")
    };

    let server_url = format!("{host}:{port}");
    info!("Server run on: {}", server_url);

    // Database connection
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(50)
        .min_connections(10)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false);

    let conn = Database::connect(opt)
        .await
        .expect("Failed to connect to database");

    let db_arc = Arc::new(conn);

    // Repositories
    let user_store = Arc::new(UserStorePostgres::new(Arc::clone(&db_arc)));
    let rsvp_repo = Arc::new(RsvpRepositoryPostgres::new(Arc::clone(&db_arc)));
    let email_job_repo = Arc::new(EmailJobRepositoryPostgres::new(Arc::clone(&db_arc)));
    let guestbook_repo = Arc::new(GuestbookRepositoryPostgres::new(Arc::clone(&db_arc)));

    // Auth
    let jwt_service = JwtSessionService::new(SessionConfig::from_env());
    let token_provider_arc: Arc<dyn TokenProvider + Send + Sync> = Arc::new(jwt_service);
    let user_query_arc: Arc<dyn UserQuery + Send + Sync> = Arc::new((*user_store).clone());

    let login_with_qr_token_use_case = LoginWithQrTokenUseCase::new(
        (*user_store).clone(),
        Arc::clone(&token_provider_arc),
    );
    let session_authenticator =
        SessionAuthenticator::new(Arc::clone(&token_provider_arc), Arc::clone(&user_query_arc));

    // Email queue
    let enqueue_email_use_case: Arc<dyn IEnqueueEmailUseCase + Send + Sync> =
        Arc::new(EnqueueEmailUseCase::new(Arc::clone(&email_job_repo)));
    let process_email_queue_use_case: Arc<dyn IProcessEmailQueueUseCase + Send + Sync> =
        Arc::new(ProcessEmailQueueUseCase::new(
            Arc::clone(&email_job_repo),
            Arc::clone(&user_store),
            Arc::new(smtp_sender),
        ));

    // RSVP
    let create_rsvp_use_case: Arc<dyn ICreateRsvpUseCase + Send + Sync> = Arc::new(
        CreateRsvpUseCase::new(Arc::clone(&rsvp_repo), Arc::clone(&user_store)),
    );
    let rsvp_submission_orchestrator = RsvpSubmissionOrchestrator::new(
        create_rsvp_use_case,
        Arc::clone(&enqueue_email_use_case),
    );
    let edit_rsvp_use_case =
        EditRsvpUseCase::new(Arc::clone(&rsvp_repo), Arc::clone(&user_store));
    let get_rsvp_use_case = GetRsvpUseCase::new(Arc::clone(&rsvp_repo));

    // Guestbook
    let post_message_use_case = PostMessageUseCase::new(Arc::clone(&guestbook_repo));
    let list_messages_use_case = ListMessagesUseCase::new(Arc::clone(&guestbook_repo));
    let moderate_message_use_case = ModerateMessageUseCase::new(Arc::clone(&guestbook_repo));

    // Admin
    let send_reminder_use_case = SendReminderUseCase::new(
        Arc::clone(&user_store),
        Arc::clone(&user_store),
        Arc::clone(&enqueue_email_use_case),
    );
    let rsvp_stats_use_case =
        RsvpStatsUseCase::new(Arc::clone(&rsvp_repo), Arc::clone(&user_store));
    let create_guest_use_case = CreateGuestUseCase::new(Arc::clone(&user_store));
    let list_guests_use_case = ListGuestsUseCase::new(Arc::clone(&user_store));
    let export_guests_use_case =
        ExportGuestsUseCase::new(Arc::clone(&user_store), Arc::clone(&rsvp_repo));
    let email_history_use_case = EmailHistoryUseCase::new(Arc::clone(&email_job_repo));

    let state = AppState {
        login_with_qr_token_use_case: Arc::new(login_with_qr_token_use_case),
        get_rsvp_use_case: Arc::new(get_rsvp_use_case),
        create_rsvp_use_case: Arc::new(rsvp_submission_orchestrator),
        edit_rsvp_use_case: Arc::new(edit_rsvp_use_case),
        post_message_use_case: Arc::new(post_message_use_case),
        list_messages_use_case: Arc::new(list_messages_use_case),
        moderate_message_use_case: Arc::new(moderate_message_use_case),
        email_history_use_case: Arc::new(email_history_use_case),
        process_email_queue_use_case: Arc::clone(&process_email_queue_use_case),
        send_reminder_use_case: Arc::new(send_reminder_use_case),
        rsvp_stats_use_case: Arc::new(rsvp_stats_use_case),
        create_guest_use_case: Arc::new(create_guest_use_case),
        list_guests_use_case: Arc::new(list_guests_use_case),
        export_guests_use_case: Arc::new(export_guests_use_case),
    };

    // Background queue ticker
    let poll_seconds: u64 = env::var("EMAIL_QUEUE_POLL_SECONDS")
        .unwrap_or_else(|_| "60".to_string())
        .parse()
        .expect("Invalid EMAIL_QUEUE_POLL_SECONDS");
    let queue_for_ticker = Arc::clone(&process_email_queue_use_case);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(poll_seconds));
        loop {
            interval.tick().await;
            if let Err(e) = queue_for_ticker.execute().await {
                tracing::error!("scheduled queue pass failed: {e}");
            }
        }
    });

    let schema = crate::api::graphql::schema::build_schema(state.clone());
    let db_for_server = Arc::clone(&db_arc);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::Data::new(session_authenticator.clone()))
            .app_data(web::Data::new(Arc::clone(&db_for_server)))
            .configure(init_routes)
    })
    .bind(server_url)?
    .run()
    .await
}

#[cfg(not(tarpaulin_include))]
fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health
    cfg.service(crate::health::health);
    cfg.service(crate::health::readiness);
    // GraphQL
    crate::api::graphql::handler::init_routes(cfg);
}

#[cfg(not(tarpaulin_include))]
fn main() {
    if let Err(e) = start() {
        eprintln!("Error starting app: {e}");
    }
}
