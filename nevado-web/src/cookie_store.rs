use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use nevado_core::{CoreResult, KeyValueStore};

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, String>,
    changed: Vec<String>,
}

/// [`KeyValueStore`] over the browser's cookies for the span of one request.
///
/// Reads come from the request's cookie header. Writes are buffered and turned into
/// `Set-Cookie` headers by [`CookieStore::apply`].
#[derive(Debug, Default)]
pub struct CookieStore {
    entries: Mutex<Entries>,
}

impl CookieStore {
    pub fn from_jar(jar: &CookieJar) -> Self {
        let values = jar
            .iter()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();
        Self {
            entries: Mutex::new(Entries {
                values,
                changed: Vec::new(),
            }),
        }
    }

    /// Add the buffered writes and removals to the response jar
    pub fn apply(&self, mut jar: CookieJar) -> CookieJar {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for key in &entries.changed {
            jar = match entries.values.get(key) {
                Some(value) => jar.add(
                    Cookie::build((key.clone(), value.clone()))
                        .path("/")
                        .http_only(true)
                        .same_site(SameSite::Lax),
                ),
                None => jar.remove(Cookie::build((key.clone(), String::new())).path("/")),
            };
        }
        jar
    }

    fn mark(entries: &mut Entries, key: &str) {
        if !entries.changed.iter().any(|changed| changed == key) {
            entries.changed.push(key.to_string());
        }
    }
}

impl KeyValueStore for CookieStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values.insert(key.to_string(), value.to_string());
        Self::mark(&mut entries, key);
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.values.remove(key).is_some() {
            Self::mark(&mut entries, key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nevado_core::RESUME_STATE_KEY;

    #[test]
    fn test_reads_request_cookies() {
        let jar = CookieJar::new().add(Cookie::new(RESUME_STATE_KEY, r#"{"returnPath":"/tours/t1"}"#));
        let store = CookieStore::from_jar(&jar);
        assert_eq!(
            store.get(RESUME_STATE_KEY).unwrap().as_deref(),
            Some(r#"{"returnPath":"/tours/t1"}"#)
        );
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn test_writes_become_response_cookies() {
        let store = CookieStore::from_jar(&CookieJar::new());
        store.set(RESUME_STATE_KEY, "v1").unwrap();
        store.set(RESUME_STATE_KEY, "v2").unwrap();

        let jar = store.apply(CookieJar::new());
        let cookie = jar.get(RESUME_STATE_KEY).unwrap();
        assert_eq!(cookie.value(), "v2");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_removal_clears_cookie() {
        let request = CookieJar::new().add(Cookie::new(RESUME_STATE_KEY, "v1"));
        let store = CookieStore::from_jar(&request);
        store.remove(RESUME_STATE_KEY).unwrap();

        let jar = store.apply(request);
        assert!(jar.get(RESUME_STATE_KEY).is_none());
    }

    #[test]
    fn test_untouched_store_changes_nothing() {
        let store = CookieStore::from_jar(&CookieJar::new());
        store.remove("missing").unwrap();
        assert_eq!(store.apply(CookieJar::new()).iter().count(), 0);
    }
}
