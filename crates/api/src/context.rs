use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use serde::Deserialize;

use worksphere_auth::WorkspaceSelector;
use worksphere_workspace::User;

/// Header carrying the active workspace id on every workspace-scoped request.
pub const WORKSPACE_HEADER: &str = "x-workspace-id";

/// The authenticated user behind the request.
///
/// Inserted by the auth middleware next to the `RequestContext`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[derive(Debug, Default, Deserialize)]
struct WorkspaceQuery {
    workspace_id: Option<String>,
}

/// Active workspace as requested by the client: the header, else the
/// `workspace_id` query parameter.
pub fn workspace_selector(headers: &HeaderMap, uri: &Uri) -> WorkspaceSelector {
    if let Some(value) = headers.get(WORKSPACE_HEADER) {
        return match value.to_str() {
            Ok(raw) => WorkspaceSelector::from_raw(Some(raw)),
            Err(_) => WorkspaceSelector::Malformed,
        };
    }
    let query = Query::<WorkspaceQuery>::try_from_uri(uri)
        .map(|Query(q)| q)
        .unwrap_or_default();
    WorkspaceSelector::from_raw(query.workspace_id.as_deref())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use worksphere_core::WorkspaceId;

    use super::*;

    #[test]
    fn header_takes_precedence_over_query() {
        let header_ws = WorkspaceId::new();
        let query_ws = WorkspaceId::new();
        let mut headers = HeaderMap::new();
        headers.insert(WORKSPACE_HEADER, HeaderValue::from_str(&header_ws.to_string()).unwrap());
        let uri: Uri = format!("/expenses?workspace_id={query_ws}").parse().unwrap();

        assert_eq!(workspace_selector(&headers, &uri), WorkspaceSelector::Id(header_ws));
        assert_eq!(workspace_selector(&HeaderMap::new(), &uri), WorkspaceSelector::Id(query_ws));
    }

    #[test]
    fn absent_and_malformed_selectors() {
        let uri: Uri = "/expenses".parse().unwrap();
        assert_eq!(workspace_selector(&HeaderMap::new(), &uri), WorkspaceSelector::Missing);

        let mut headers = HeaderMap::new();
        headers.insert(WORKSPACE_HEADER, HeaderValue::from_static("nope"));
        assert_eq!(workspace_selector(&headers, &uri), WorkspaceSelector::Malformed);
    }
}
