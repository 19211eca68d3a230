use crate::{
    core::IntegrationRecord,
    error::{Error, Result},
};

/// Returns the first record of `type_tag` whose cross-account role is `role_arn`.
pub fn find_integration<'a>(
    records: &'a [IntegrationRecord],
    type_tag: &str,
    role_arn: &str,
) -> Result<&'a IntegrationRecord> {
    records
        .iter()
        .filter(|record| record.type_tag == type_tag)
        .find(|record| record.data.role_arn() == Some(role_arn))
        .ok_or_else(|| Error::IntegrationNotFound {
            role_arn: role_arn.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IntegrationData, AWS_CFG};

    const ROLE_X: &str = "arn:aws:iam::1:role/X";
    const ROLE_Y: &str = "arn:aws:iam::1:role/Y";

    fn record(guid: &str, type_tag: &str, role_arn: Option<&str>) -> IntegrationRecord {
        IntegrationRecord {
            guid: guid.to_string(),
            name: format!("{guid}-name"),
            type_tag: type_tag.to_string(),
            enabled: true,
            data: role_arn
                .map(|arn| IntegrationData::cross_account("ext", arn))
                .unwrap_or_default(),
        }
    }

    #[test]
    fn finds_matching_record() {
        let records = vec![
            record("g0", "SLACK_CHANNEL", None),
            record("g1", AWS_CFG, Some(ROLE_X)),
        ];

        let found = find_integration(&records, AWS_CFG, ROLE_X).unwrap();
        assert_eq!(found.guid, "g1");
    }

    #[test]
    fn skips_records_with_other_role() {
        let records = vec![record("g1", AWS_CFG, Some(ROLE_Y))];

        let err = find_integration(&records, AWS_CFG, ROLE_X).unwrap_err();
        assert!(matches!(err, Error::IntegrationNotFound { role_arn } if role_arn == ROLE_X));
    }

    #[test]
    fn skips_other_types_with_same_role() {
        let records = vec![
            record("g1", "AWS_CT_SQS", Some(ROLE_X)),
            record("g2", AWS_CFG, Some(ROLE_X)),
        ];

        let found = find_integration(&records, AWS_CFG, ROLE_X).unwrap();
        assert_eq!(found.guid, "g2");
    }

    #[test]
    fn type_match_is_exact() {
        // A substring of the tag must not count as a match.
        let records = vec![record("g1", "AWS", Some(ROLE_X))];

        assert!(find_integration(&records, AWS_CFG, ROLE_X).is_err());
    }

    #[test]
    fn first_duplicate_wins() {
        let records = vec![
            record("g1", AWS_CFG, Some(ROLE_X)),
            record("g2", AWS_CFG, Some(ROLE_X)),
        ];

        let found = find_integration(&records, AWS_CFG, ROLE_X).unwrap();
        assert_eq!(found.guid, "g1");
    }

    #[test]
    fn empty_list_is_not_found() {
        assert!(matches!(
            find_integration(&[], AWS_CFG, ROLE_X),
            Err(Error::IntegrationNotFound { .. })
        ));
    }
}
