/// Query builder for list calls. Field selection and pagination are always
/// sent explicitly so the remote never defaults to "all fields" or an
/// unbounded page.
#[derive(Debug, Clone)]
pub struct RecordQuery {
    filter: Vec<String>,
    fields: Vec<String>,
    limit: u32,
    offset: u32,
    order_desc: Option<String>,
}

impl RecordQuery {
    pub fn new(fields: &[&str]) -> Self {
        Self {
            filter: Vec::new(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            limit: 20,
            offset: 0,
            order_desc: None,
        }
    }

    /// Append one encoded-query term; terms are AND-joined with `^`.
    pub fn filter_term(mut self, term: impl Into<String>) -> Self {
        self.filter.push(term.into());
        self
    }

    pub fn page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_desc = Some(field.into());
        self
    }

    /// Render the `sysparm_*` query-string pairs.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut encoded = self.filter.join("^");
        if let Some(ref field) = self.order_desc {
            if !encoded.is_empty() {
                encoded.push('^');
            }
            encoded.push_str("ORDERBYDESC");
            encoded.push_str(field);
        }

        let mut params = Vec::new();
        if !encoded.is_empty() {
            params.push(("sysparm_query".to_string(), encoded));
        }
        params.push(("sysparm_fields".to_string(), self.fields.join(",")));
        params.push(("sysparm_limit".to_string(), self.limit.to_string()));
        params.push(("sysparm_offset".to_string(), self.offset.to_string()));
        params
    }
}
