use tiktok_metrics::configuration::{get_configuration_from, DEFAULT_ACTOR_ID};

#[test]
fn token_can_come_from_a_dotenv_file() {
    std::env::remove_var("APIFY_TOKEN");
    std::env::remove_var("APP_APIFY__TOKEN");
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "APIFY_TOKEN=from-dotenv\n").unwrap();

    let settings = get_configuration_from(dir.path()).expect("Failed to read configuration.");

    assert_eq!(settings.apify.token, "from-dotenv");
    assert_eq!(settings.apify.actor_id, DEFAULT_ACTOR_ID);
}
