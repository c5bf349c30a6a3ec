mod common;

use safecity::core::dashboard::{update_graphs, update_heatmap};
use safecity::{
    load_dashboard_data, AppConfig, CrimePipeline, EtlEngine, ExportPipeline, LocalStorage,
    SafeCityError,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_load_from_data_directory() {
    let temp_dir = TempDir::new().unwrap();
    common::write_data_dir(temp_dir.path());

    let config = AppConfig::with_data_dir(temp_dir.path().to_str().unwrap());
    let data = load_dashboard_data(&config).await.unwrap();

    assert!(data.is_complete());
    let crimes = data.crimes.as_ref().unwrap();
    assert_eq!(crimes.months, vec!["201904", "201905", "201906"]);
    assert_eq!(crimes.len(), 18);
    assert_eq!(
        crimes.borough_names(),
        vec!["Camden", "Westminster", "Barnet"]
    );
    assert_eq!(
        data.boundaries.as_ref().unwrap().names,
        vec!["Camden", "Westminster", "Barnet"]
    );
}

#[tokio::test]
async fn test_missing_data_directory_degrades_to_error_figures() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig::with_data_dir(temp_dir.path().join("absent").to_str().unwrap());

    let data = load_dashboard_data(&config).await.unwrap();
    assert!(data.crimes.is_none());
    assert!(data.boundaries.is_none());

    let heatmap = serde_json::to_value(update_heatmap(&data, 1)).unwrap();
    assert_eq!(
        heatmap["layout"]["annotations"][0]["text"],
        "Error: No data available"
    );
    assert!(!update_graphs(&data, 1, None, Some("Camden")).is_visible());
}

#[tokio::test]
async fn test_missing_boundaries_only_affects_heatmap() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("crime_cleaned.csv"), common::CRIME_CSV).unwrap();

    let config = AppConfig::with_data_dir(temp_dir.path().to_str().unwrap());
    let data = load_dashboard_data(&config).await.unwrap();

    assert!(data.boundaries.is_none());
    let heatmap = serde_json::to_value(update_heatmap(&data, 0)).unwrap();
    assert!(heatmap["data"].as_array().unwrap().is_empty());

    let update = update_graphs(&data, 1, Some("Theft"), Some("Camden"));
    assert!(update.is_visible());
    let breakdown = serde_json::to_value(update.breakdown_figure.unwrap()).unwrap();
    assert_eq!(breakdown["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_malformed_csv_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("crime_cleaned.csv"),
        "BoroughName,MajorText,MinorText,201904\nCamden,Theft,Shoplifting,lots\n",
    )
    .unwrap();

    let config = AppConfig::with_data_dir(temp_dir.path().to_str().unwrap());
    let err = load_dashboard_data(&config).await.unwrap_err();
    assert!(matches!(err, SafeCityError::MalformedData { .. }));
}

#[tokio::test]
async fn test_export_writes_long_format_and_totals() {
    let data_dir = TempDir::new().unwrap();
    common::write_data_dir(data_dir.path());
    let output_dir = TempDir::new().unwrap();

    let config = AppConfig::with_data_dir(data_dir.path().to_str().unwrap());
    let source = CrimePipeline::new(LocalStorage::new(data_dir.path()), config);
    let pipeline = ExportPipeline::new(source, LocalStorage::new(output_dir.path()));

    let output = EtlEngine::new_with_monitoring(pipeline, true)
        .run()
        .await
        .unwrap();
    assert_eq!(output, output_dir.path().display().to_string());

    let long = std::fs::read_to_string(output_dir.path().join("crime_long.csv")).unwrap();
    let lines: Vec<&str> = long.lines().collect();
    assert_eq!(lines.len(), 19);
    assert_eq!(
        lines[0],
        "BoroughName,MajorCrimeCategory,CrimeSubcategory,Month,CrimeCount"
    );
    assert_eq!(lines[1], "Camden,Theft,Shoplifting,201904,40");
    assert_eq!(lines[18], "Barnet,Burglary,Domestic Burglary,201906,0");

    let totals = std::fs::read_to_string(output_dir.path().join("borough_totals.csv")).unwrap();
    assert_eq!(
        totals,
        "BoroughName,CrimeCount\nBarnet,30\nCamden,185\nWestminster,453\n"
    );
}

#[tokio::test]
async fn test_export_without_crime_data_fails() {
    let data_dir = TempDir::new().unwrap();
    let output_dir = TempDir::new().unwrap();

    let config = AppConfig::with_data_dir(data_dir.path().to_str().unwrap());
    let source = CrimePipeline::new(LocalStorage::new(data_dir.path()), config);
    let pipeline = ExportPipeline::new(source, LocalStorage::new(output_dir.path()));

    let err = EtlEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, SafeCityError::CrimeDataRequired { .. }));
    assert!(!output_dir.path().join("crime_long.csv").exists());
}
