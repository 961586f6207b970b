use course_service::config::CourseConfig;
use course_service::services::MongoDb;
use course_service::startup::Application;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    /// Spawn the service against a throwaway database on the MongoDB named by
    /// `MONGO_URI` (default `mongodb://localhost:27017`).
    pub async fn spawn() -> Self {
        let db_name = format!("course_test_{}", Uuid::new_v4());

        let mut config = CourseConfig::load().expect("Failed to load configuration");
        config.common.port = 0; // Random port for testing
        config.mongodb.database = db_name.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().expect("Application built without MongoDB").clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            db,
            db_name,
        }
    }

    pub fn courses_url(&self) -> String {
        format!("{}/cursos/", self.address)
    }

    pub fn course_url(&self, code: &str) -> String {
        format!("{}/cursos/{}", self.address, code)
    }

    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
