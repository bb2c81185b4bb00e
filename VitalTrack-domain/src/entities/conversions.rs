use crate::entities::reading::{CreateReadingRequest, Reading};

/// Conversion functions between domain entities and data models
/// These functions follow the pattern convert_to_[target_layer]_[model_name]

/// Convert from data model to domain entity for a reading
pub fn convert_to_domain_reading(data_reading: vital_track_data::models::Reading) -> Reading {
    Reading {
        id: data_reading.id,
        date: data_reading.date,
        time: data_reading.time,
        period: data_reading.period,
        systolic: data_reading.systolic,
        diastolic: data_reading.diastolic,
        pulse: data_reading.pulse,
        oxygen: data_reading.oxygen,
        notes: data_reading.notes,
    }
}

/// Convert from domain entity to data model for a create request
///
/// Blank optional text is stored as absent.
pub fn convert_to_data_create_request(domain_request: &CreateReadingRequest)
    -> vital_track_data::models::CreateReadingRequest
{
    vital_track_data::models::CreateReadingRequest {
        date: domain_request.date.clone(),
        time: domain_request.time.clone(),
        period: non_blank(&domain_request.period),
        systolic: domain_request.systolic,
        diastolic: domain_request.diastolic,
        pulse: domain_request.pulse,
        oxygen: domain_request.oxygen,
        notes: non_blank(&domain_request.notes),
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_to_domain_reading() {
        let data_reading = vital_track_data::models::Reading {
            id: 7,
            date: "2024-04-01".to_string(),
            time: "06:45".to_string(),
            period: Some("Morning".to_string()),
            systolic: Some(128),
            diastolic: Some(84),
            pulse: Some(66),
            oxygen: Some(96),
            notes: Some("Test reading".to_string()),
        };

        let domain_reading = convert_to_domain_reading(data_reading.clone());

        assert_eq!(domain_reading.id, data_reading.id);
        assert_eq!(domain_reading.date, data_reading.date);
        assert_eq!(domain_reading.time, data_reading.time);
        assert_eq!(domain_reading.period, data_reading.period);
        assert_eq!(domain_reading.systolic, data_reading.systolic);
        assert_eq!(domain_reading.diastolic, data_reading.diastolic);
        assert_eq!(domain_reading.pulse, data_reading.pulse);
        assert_eq!(domain_reading.oxygen, data_reading.oxygen);
        assert_eq!(domain_reading.notes, data_reading.notes);
    }

    #[test]
    fn test_blank_text_is_dropped() {
        let domain_request = CreateReadingRequest {
            date: "2024-04-01".to_string(),
            time: "06:45".to_string(),
            period: Some("   ".to_string()),
            systolic: None,
            diastolic: None,
            pulse: Some(70),
            oxygen: None,
            notes: Some("  slept badly ".to_string()),
        };

        let data_request = convert_to_data_create_request(&domain_request);

        assert_eq!(data_request.period, None);
        assert_eq!(data_request.notes.as_deref(), Some("slept badly"));
        assert_eq!(data_request.pulse, Some(70));
    }
}
