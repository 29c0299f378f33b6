use jsonbuckets_api::{run_server, telemetry};

#[tokio::main]
async fn main() {
    telemetry::init();

    if let Err(err) = run_server().await {
        tracing::error!(error = %err, "Server terminated with error");
        std::process::exit(1);
    }
}
