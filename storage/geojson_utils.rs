use geojson::{feature::Id, Feature, Geometry, JsonObject, Value};
use serde_json::json;

use crate::index::DistanceResult;

/// 将查询结果转为 GeoJSON Feature
///
/// 几何体为 Point（GeoJSON 坐标顺序为 [经度, 纬度]），
/// 描述字段和距离（英里）放在 properties 中
pub fn result_to_feature(result: &DistanceResult) -> Feature {
    let record = &result.record;

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(record.name));
    properties.insert("location".to_string(), json!(record.location));
    properties.insert("borough".to_string(), json!(record.borough));
    properties.insert("handicap_ok".to_string(), json!(record.handicap_ok));
    properties.insert("open_all_year".to_string(), json!(record.open_all_year));
    properties.insert("updated_at".to_string(), json!(record.updated_at));
    properties.insert("distance_miles".to_string(), json!(result.distance));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            record.coordinate.longitude,
            record.coordinate.latitude,
        ]))),
        id: Some(Id::String(record.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// 查询结果序列化为 GeoJSON Feature 字符串
pub fn result_to_geojson(result: &DistanceResult) -> crate::Result<String> {
    Ok(serde_json::to_string(&result_to_feature(result))?)
}
