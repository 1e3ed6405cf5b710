use rocket::{
    figment::Figment,
    get,
    http::Status,
    launch,
    request::{FromRequest, Outcome},
    routes,
    serde::json::Json,
};
use sysinfo::{Disks, System};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};
use uptime_monitoring::{
    util::{get_addr, get_api_key, get_port},
    HealthReport,
};

#[get("/health")]
fn health(_key: ApiKey) -> Json<HealthReport> {
    let mut sys = System::new_all();
    sys.refresh_all();
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_all();

    let disks = Disks::new_with_refreshed_list();
    let disk_total: u64 = disks.iter().map(|disk| disk.total_space()).sum();
    let disk_available: u64 = disks.iter().map(|disk| disk.available_space()).sum();

    Json(HealthReport {
        cpu: sys.global_cpu_usage() as f64,
        mem_used: sys.used_memory(),
        mem_total: sys.total_memory(),
        disk_used: disk_total.saturating_sub(disk_available),
        disk_total,
    })
}

#[get("/ping")]
fn ping() {}

fn init() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter::LevelFilter::DEBUG)
        .init();
}

fn get_config() -> Figment {
    rocket::Config::figment()
        .merge(("port", get_port()))
        .merge(("address", get_addr()))
        .merge(("workers", 1))
}

#[launch]
fn rocket() -> _ {
    init();
    let figment = get_config();

    rocket::custom(figment).mount("/", routes![health, ping])
}

/// Request guard checking `x-api-key` against the AGENT_KEY env var.
/// If no key is configured, the endpoint is open.
#[derive(Debug)]
struct ApiKey;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ApiKey {
    type Error = ();

    async fn from_request(
        request: &'r rocket::Request<'_>,
    ) -> rocket::request::Outcome<Self, Self::Error> {
        let header = request.headers().get_one("x-api-key");
        let expected = get_api_key();
        if let Some(expected) = expected {
            match header {
                Some(passed) if passed == expected => Outcome::Success(ApiKey),
                _ => Outcome::Error((Status::Unauthorized, ())),
            }
        } else {
            Outcome::Success(ApiKey)
        }
    }
}
