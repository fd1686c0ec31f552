use serde::Deserialize;

/// Common `skip`/`limit` query parameters for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    100
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { skip: 0, limit: default_limit() }
    }
}

impl ListQuery {
    /// Cap `limit` so a single request cannot page the whole table.
    pub fn clamped(self, max: u64) -> Self {
        Self { skip: self.skip, limit: self.limit.min(max) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let q = ListQuery::default();
        assert_eq!(q.skip, 0);
        assert_eq!(q.limit, 100);
    }

    #[test]
    fn clamp_caps_limit() {
        let q = ListQuery { skip: 5, limit: 10_000 }.clamped(500);
        assert_eq!(q.skip, 5);
        assert_eq!(q.limit, 500);
    }
}
