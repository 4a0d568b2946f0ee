//! Display name to identifier derivation

/// Turn an arbitrary display name into a hostname-safe token.
///
/// Non-ASCII characters are transliterated, anything that is not a
/// lowercase letter or a digit becomes a single dash, and leading or
/// trailing dashes are trimmed.
pub fn build_slug(raw: &str) -> String {
    slug::slugify(raw).replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_slug() {
        let cases = [
            ("env_name", "env-name"),
            ("this is the env name", "this-is-the-env-name"),
            ("this is !() the cluster ^`$ name", "this-is-the-cluster-name"),
            ("env_name_4837''", "env-name-4837"),
            ("Crème Brûlée", "creme-brulee"),
            ("--Already--Dashed--", "already-dashed"),
        ];

        for (raw, expected) in cases {
            assert_eq!(build_slug(raw), expected, "slug of {:?}", raw);
        }
    }

    #[test]
    fn test_build_slug_is_idempotent() {
        for raw in ["cluster_name", "this is !() the cluster ^`$ name", "eleven/api-2", "ÀÉÎ õü"] {
            let once = build_slug(raw);
            assert_eq!(build_slug(&once), once);
        }
    }
}
