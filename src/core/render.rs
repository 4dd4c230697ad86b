use crate::domain::model::TrackingView;
use crate::utils::error::{Result, TrackingError};

pub fn render_table(views: &[TrackingView]) -> String {
    if views.is_empty() {
        return "No tracking numbers.\n".to_string();
    }

    let number_width = views
        .iter()
        .map(|view| view.number.len())
        .max()
        .unwrap_or(0)
        .max("NUMBER".len());

    let mut out = format!(
        "{:<5}  {:<width$}  {}\n",
        "INDEX",
        "NUMBER",
        "TRACKING URL",
        width = number_width
    );
    for view in views {
        out.push_str(&format!(
            "{:<5}  {:<width$}  {}\n",
            view.index,
            view.number,
            view.tracking_url,
            width = number_width
        ));
    }
    out
}

pub fn render_json(views: &[TrackingView]) -> Result<String> {
    Ok(serde_json::to_string_pretty(views)?)
}

pub fn render_csv(views: &[TrackingView]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["index", "number", "tracking_url", "service"])?;
    for view in views {
        writer.write_record([
            view.index.to_string().as_str(),
            view.number.as_str(),
            view.tracking_url.as_str(),
            view.service.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| TrackingError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| TrackingError::InvalidRequest {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn views() -> Vec<TrackingView> {
        vec![
            TrackingView {
                index: 0,
                number: "9400100000000000000000".to_string(),
                tracking_url: "https://t.example/?n=9400100000000000000000".to_string(),
                service: Some("USPS Tracking".to_string()),
            },
            TrackingView {
                index: 1,
                number: "AB12345678901234567890".to_string(),
                tracking_url: "https://t.example/?n=AB12345678901234567890".to_string(),
                service: None,
            },
        ]
    }

    #[test]
    fn test_render_csv() {
        let csv = render_csv(&views()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "index,number,tracking_url,service");
        assert_eq!(
            lines[1],
            "0,9400100000000000000000,https://t.example/?n=9400100000000000000000,USPS Tracking"
        );
        assert_eq!(
            lines[2],
            "1,AB12345678901234567890,https://t.example/?n=AB12345678901234567890,"
        );
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&views());
        assert!(table.starts_with("INDEX"));
        assert_eq!(table.lines().count(), 3);
        assert_eq!(render_table(&[]), "No tracking numbers.\n");
    }

    #[test]
    fn test_render_json_skips_missing_service() {
        let json = render_json(&views()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["service"], "USPS Tracking");
        assert!(parsed[1].get("service").is_none());
    }
}
