//! Query request parsing and validation

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::domain::knowledge_base::Scope;

/// Default number of similarity results
pub const DEFAULT_TOP_K: i64 = 5;

/// Upper bound accepted for `topK`
pub const MAX_TOP_K: i64 = 50;

/// Default page for document listings
pub const DEFAULT_PAGE: usize = 1;

/// Default page size for document listings
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Limits applied when validating similarity queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub default_top_k: i64,
    pub max_top_k: i64,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            max_top_k: MAX_TOP_K,
        }
    }
}

/// Raw query body as received from clients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub kb_id: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub top_k: Option<i64>,
    #[serde(default)]
    pub min_score: Option<f32>,
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub full: Option<bool>,
}

/// A validated query, in exactly one of the two modes
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPlan {
    Similarity {
        scope: Scope,
        query: String,
        top_k: usize,
        min_score: f32,
    },
    Document {
        scope: Scope,
        doc_id: String,
        full: bool,
    },
}

impl QueryPlan {
    pub fn scope(&self) -> &Scope {
        match self {
            Self::Similarity { scope, .. } | Self::Document { scope, .. } => scope,
        }
    }

    /// Metric label for the mode
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Similarity { .. } => "similarity",
            Self::Document { .. } => "document",
        }
    }
}

impl QueryRequest {
    pub fn similarity(tenant_id: &str, kb_id: &str, query: &str) -> Self {
        Self {
            tenant_id: Some(tenant_id.to_string()),
            kb_id: Some(kb_id.to_string()),
            query: Some(query.to_string()),
            ..Default::default()
        }
    }

    pub fn document(tenant_id: &str, kb_id: &str, doc_id: &str, full: bool) -> Self {
        Self {
            tenant_id: Some(tenant_id.to_string()),
            kb_id: Some(kb_id.to_string()),
            doc_id: Some(doc_id.to_string()),
            full: Some(full),
            ..Default::default()
        }
    }

    pub fn with_top_k(mut self, top_k: i64) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Validate the request and decide its mode. A non-blank `docId` selects
    /// document mode; otherwise `query` must be non-blank.
    pub fn plan(&self, limits: &QueryLimits) -> Result<QueryPlan, DomainError> {
        let scope = Scope::from_optional(self.tenant_id.as_deref(), self.kb_id.as_deref())?;
        let top_k = validate_top_k(self.top_k, limits)?;
        let min_score = validate_min_score(self.min_score)?;

        if let Some(doc_id) = non_blank(self.doc_id.as_deref()) {
            return Ok(QueryPlan::Document {
                scope,
                doc_id: doc_id.to_string(),
                full: self.full.unwrap_or(false),
            });
        }

        let query = non_blank(self.query.as_deref()).ok_or_else(|| {
            DomainError::bad_request("query is required when docId is not provided")
        })?;

        Ok(QueryPlan::Similarity {
            scope,
            query: query.to_string(),
            top_k,
            min_score,
        })
    }
}

/// Normalize listing pagination, falling back to defaults for absent or non-positive values
pub fn normalize_page(page: Option<i64>, size: Option<i64>) -> (usize, usize) {
    let page = page.filter(|p| *p > 0).map_or(DEFAULT_PAGE, |p| p as usize);
    let size = size.filter(|s| *s > 0).map_or(DEFAULT_PAGE_SIZE, |s| s as usize);

    (page, size)
}

fn validate_top_k(top_k: Option<i64>, limits: &QueryLimits) -> Result<usize, DomainError> {
    let top_k = top_k.unwrap_or(limits.default_top_k);

    if top_k <= 0 || top_k > limits.max_top_k {
        return Err(DomainError::invalid_argument(format!(
            "topK must be in range [1, {}]",
            limits.max_top_k
        )));
    }

    Ok(top_k as usize)
}

fn validate_min_score(min_score: Option<f32>) -> Result<f32, DomainError> {
    let min_score = min_score.unwrap_or(0.0);

    // Thresholds above 1 are allowed and simply match nothing
    if !min_score.is_finite() || min_score < 0.0 {
        return Err(DomainError::invalid_argument(
            "minScore must be a finite number >= 0",
        ));
    }

    Ok(min_score)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> QueryLimits {
        QueryLimits::default()
    }

    #[test]
    fn test_similarity_plan_defaults() {
        let plan = QueryRequest::similarity("tenant1", "kb1", "pre-commit ingestion")
            .plan(&limits())
            .unwrap();

        match plan {
            QueryPlan::Similarity {
                scope,
                query,
                top_k,
                min_score,
            } => {
                assert_eq!(scope.tenant_id(), "tenant1");
                assert_eq!(query, "pre-commit ingestion");
                assert_eq!(top_k, 5);
                assert_eq!(min_score, 0.0);
            }
            other => panic!("unexpected plan: {:?}", other),
        }
    }

    #[test]
    fn test_doc_id_selects_document_mode() {
        let mut request = QueryRequest::document("tenant1", "kb1", " doc-1 ", true);
        request.query = Some("ignored".to_string());

        let plan = request.plan(&limits()).unwrap();
        assert_eq!(plan.mode(), "document");
        assert_eq!(
            plan,
            QueryPlan::Document {
                scope: Scope::new("tenant1", "kb1").unwrap(),
                doc_id: "doc-1".to_string(),
                full: true,
            }
        );
    }

    #[test]
    fn test_blank_query_and_doc_id_is_bad_request() {
        let request = QueryRequest {
            tenant_id: Some("tenant1".to_string()),
            kb_id: Some("kb1".to_string()),
            query: Some("   ".to_string()),
            doc_id: Some("".to_string()),
            ..Default::default()
        };

        let err = request.plan(&limits()).unwrap_err();
        assert!(matches!(err, DomainError::BadRequest { .. }));
    }

    #[test]
    fn test_missing_scope_is_bad_request() {
        let request = QueryRequest {
            query: Some("hello".to_string()),
            ..Default::default()
        };

        let err = request.plan(&limits()).unwrap_err();
        assert_eq!(err, DomainError::bad_request("tenantId is required"));
    }

    #[test]
    fn test_non_positive_top_k_is_invalid_argument() {
        for top_k in [0, -3] {
            let err = QueryRequest::similarity("t", "k", "q")
                .with_top_k(top_k)
                .plan(&limits())
                .unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument { .. }));
        }
    }

    #[test]
    fn test_top_k_above_limit_rejected() {
        let err = QueryRequest::similarity("t", "k", "q")
            .with_top_k(51)
            .plan(&limits())
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_argument("topK must be in range [1, 50]")
        );
    }

    #[test]
    fn test_min_score_bounds() {
        assert!(
            QueryRequest::similarity("t", "k", "q")
                .with_min_score(-0.1)
                .plan(&limits())
                .is_err()
        );
        assert!(
            QueryRequest::similarity("t", "k", "q")
                .with_min_score(f32::NAN)
                .plan(&limits())
                .is_err()
        );
        assert!(
            QueryRequest::similarity("t", "k", "q")
                .with_min_score(0.75)
                .plan(&limits())
                .is_ok()
        );
        assert!(
            QueryRequest::similarity("t", "k", "q")
                .with_min_score(1.5)
                .plan(&limits())
                .is_ok()
        );
        assert!(
            QueryRequest::similarity("t", "k", "q")
                .with_min_score(f32::INFINITY)
                .plan(&limits())
                .is_err()
        );
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: QueryRequest = serde_json::from_str(
            r#"{"tenantId":"t","kbId":"k","query":"q","topK":3,"minScore":0.2,"full":false}"#,
        )
        .unwrap();

        assert_eq!(request.top_k, Some(3));
        assert_eq!(request.min_score, Some(0.2));
        assert_eq!(request.full, Some(false));
        assert!(request.doc_id.is_none());
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None, None), (1, 10));
        assert_eq!(normalize_page(Some(0), Some(-5)), (1, 10));
        assert_eq!(normalize_page(Some(3), Some(25)), (3, 25));
    }
}
