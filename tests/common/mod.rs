#![allow(dead_code)]

use std::path::Path;

pub const CRIME_CSV: &str = "\
BoroughName,MajorText,MinorText,201904,201905,201906
Camden,Theft,Shoplifting,40,38,45
Camden,Theft,Bicycle Theft,12,15,11
Camden,Burglary,Domestic Burglary,9,7,8
Westminster,Theft,Shoplifting,120,110,130
Westminster,Violence Against the Person,Common Assault,30,28,35
Barnet,Burglary,Domestic Burglary,14,16,
";

pub const BOROUGHS_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"name": "Camden"},
     "geometry": {"type": "Polygon", "coordinates": [[[-0.19, 51.53], [-0.12, 51.53], [-0.12, 51.57], [-0.19, 51.53]]]}},
    {"type": "Feature", "properties": {"name": "Westminster"},
     "geometry": {"type": "Polygon", "coordinates": [[[-0.21, 51.49], [-0.11, 51.49], [-0.11, 51.53], [-0.21, 51.49]]]}},
    {"type": "Feature", "properties": {"name": "Barnet"},
     "geometry": {"type": "Polygon", "coordinates": [[[-0.30, 51.60], [-0.13, 51.60], [-0.13, 51.67], [-0.30, 51.60]]]}}
  ]
}"#;

pub fn write_data_dir(dir: &Path) {
    std::fs::write(dir.join("crime_cleaned.csv"), CRIME_CSV).unwrap();
    std::fs::write(dir.join("london-boroughs_1179.geojson"), BOROUGHS_GEOJSON).unwrap();
}
