mod common;

use safecity::web::probe::wait_until_ready;
use safecity::web::serve_with_shutdown;
use safecity::{load_dashboard_data, AppConfig, AppState, DashboardData};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    _data_dir: Option<TempDir>,
}

impl TestServer {
    async fn start(data: DashboardData, data_dir: Option<TempDir>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            serve_with_shutdown(listener, AppState::new(data), async move {
                let _ = stop_rx.await;
            })
            .await
            .expect("serve app")
        });
        Self {
            addr,
            stop: Some(stop_tx),
            _data_dir: data_dir,
        }
    }

    async fn with_sample_data() -> Self {
        let dir = TempDir::new().unwrap();
        common::write_data_dir(dir.path());
        let config = AppConfig::with_data_dir(dir.path().to_str().unwrap());
        let data = load_dashboard_data(&config).await.unwrap();
        Self::start(data, Some(dir)).await
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = reqwest::get(self.url(path)).await.expect("request");
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.expect("json body");
        (status, body)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

#[tokio::test]
async fn test_health_endpoints_and_probe() {
    let server = TestServer::with_sample_data().await;

    let attempts = wait_until_ready(&server.url("/healthz"), 5, Duration::from_millis(50))
        .await
        .unwrap();
    assert_eq!(attempts, 1);

    let response = reqwest::get(server.url("/healthz")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.text().await.unwrap(), "ok");

    let (status, body) = server.get_json("/readyz").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["crime_data"], true);
    assert_eq!(body["boundaries"], true);
}

#[tokio::test]
async fn test_page_contains_dashboard_elements() {
    let server = TestServer::with_sample_data().await;

    let response = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let html = response.text().await.unwrap();

    assert!(html.contains("id=\"crime-heatmap\""));
    assert!(html.contains("id=\"borough-selection\""));
    assert!(html.contains("id=\"navigate-button\""));
    assert!(html.contains("<div id=\"graph-container\" style=\"display: none;\">"));
    assert!(html.contains("<option value=\"Westminster\">Westminster</option>"));
}

#[tokio::test]
async fn test_heatmap_loads() {
    let server = TestServer::with_sample_data().await;

    let (status, figure) = server.get_json("/api/heatmap").await;
    assert_eq!(status, 200);
    let trace = &figure["data"][0];
    assert_eq!(trace["type"], "choroplethmap");
    assert_eq!(
        trace["locations"],
        serde_json::json!(["Barnet", "Camden", "Westminster"])
    );
    assert_eq!(trace["z"], serde_json::json!([30, 185, 453]));
    assert_eq!(
        trace["geojson"]["features"].as_array().unwrap().len(),
        3
    );
    assert_eq!(figure["layout"]["title"]["text"], "Crime Heatmap of London");
}

#[tokio::test]
async fn test_navigation_shows_graphs() {
    let server = TestServer::with_sample_data().await;

    let (status, update) = server
        .get_json("/api/dashboard?n_clicks=1&borough=Camden")
        .await;
    assert_eq!(status, 200);
    assert_eq!(update["graph_container_style"]["display"], "block");
    assert_eq!(update["pie_style"]["display"], "block");
    assert_eq!(update["major_crime_style"]["display"], "block");
    assert_eq!(
        update["trend_figure"]["data"][0]["y"],
        serde_json::json!([61, 60, 64])
    );
    assert_eq!(
        update["major_crime_options"],
        serde_json::json!([
            {"label": "Theft", "value": "Theft"},
            {"label": "Burglary", "value": "Burglary"}
        ])
    );

    let (_, update) = server
        .get_json("/api/dashboard?n_clicks=2&borough=Camden&major_crime=Theft")
        .await;
    let traces = update["breakdown_figure"]["data"].as_array().unwrap();
    assert_eq!(traces.len(), 2);
    assert_eq!(traces[1]["name"], "Bicycle Theft");
    assert!(update["major_crime_value"].is_null());
    assert!(update.get("major_crime_value").is_some());
}

#[tokio::test]
async fn test_empty_borough_selection_keeps_graphs_hidden() {
    let server = TestServer::with_sample_data().await;

    for path in [
        "/api/dashboard?n_clicks=1",
        "/api/dashboard?n_clicks=1&borough=",
        "/api/dashboard?n_clicks=0&borough=Camden",
    ] {
        let (status, update) = server.get_json(path).await;
        assert_eq!(status, 200);
        assert_eq!(update["graph_container_style"]["display"], "none", "{}", path);
        assert!(update.get("trend_figure").is_none());
        assert_eq!(update["major_crime_options"], serde_json::json!([]));
    }
}

#[tokio::test]
async fn test_option_endpoints() {
    let server = TestServer::with_sample_data().await;

    let (_, boroughs) = server.get_json("/api/boroughs").await;
    assert_eq!(boroughs.as_array().unwrap().len(), 3);
    assert_eq!(boroughs[0]["value"], "Camden");

    let (_, majors) = server
        .get_json("/api/boroughs/Westminster/major-crimes")
        .await;
    assert_eq!(
        majors,
        serde_json::json!([
            {"label": "Theft", "value": "Theft"},
            {"label": "Violence Against the Person", "value": "Violence Against the Person"}
        ])
    );
}

#[tokio::test]
async fn test_bad_requests() {
    let server = TestServer::with_sample_data().await;

    let (status, body) = server.get_json("/api/dashboard?n_clicks=many").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "InvalidQueryParameter");

    let (status, body) = server.get_json("/api/nothing-here").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NotFound");
}

#[tokio::test]
async fn test_server_without_data() {
    let server = TestServer::start(DashboardData::unavailable(), None).await;

    let (_, ready) = server.get_json("/readyz").await;
    assert_eq!(ready["status"], "degraded");
    assert_eq!(ready["crime_data"], false);

    let (_, figure) = server.get_json("/api/heatmap?n_clicks=1").await;
    assert_eq!(
        figure["layout"]["annotations"][0]["text"],
        "Error: No data available"
    );

    let (_, boroughs) = server.get_json("/api/boroughs").await;
    assert_eq!(
        boroughs,
        serde_json::json!([{"label": "No data available", "value": ""}])
    );
}
