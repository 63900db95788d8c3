use url::form_urlencoded;
use url::Url;

/// Query parameters of a request, in the order they appear.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Extracts the query pairs of `url`.
    pub fn from_url(url: &Url) -> Self {
        Self {
            pairs: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// Like [`QueryParams::from_url`], but synthesizes `name=value` when the
    /// URL carries no parameters so every module has something to mutate.
    pub fn from_url_or(url: &Url, name: &str, value: &str) -> Self {
        let mut params = Self::from_url(url);
        if params.pairs.is_empty() {
            params.pairs.push((name.to_string(), value.to_string()));
        }
        params
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Distinct parameter names, first occurrence order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (k, _) in &self.pairs {
            if !names.contains(k) {
                names.push(k.clone());
            }
        }
        names
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Copy of `base` whose query carries `payload` as the only value of `name`.
    ///
    /// The other parameters keep their original values and positions; a
    /// repeated `name` collapses into its first occurrence. `self` is never
    /// modified, so each call starts from the original values.
    pub fn mutate(&self, base: &Url, name: &str, payload: &str) -> Url {
        let mut replaced = false;
        let mut pairs: Vec<(&str, &str)> = Vec::with_capacity(self.pairs.len() + 1);

        for (k, v) in &self.pairs {
            if k == name {
                if !replaced {
                    pairs.push((k, payload));
                    replaced = true;
                }
            } else {
                pairs.push((k, v));
            }
        }
        if !replaced {
            pairs.push((name, payload));
        }

        let mut url = base.clone();
        url.set_query(Some(&encode_pairs(&pairs)));
        url
    }
}

/// Serializes pairs as `application/x-www-form-urlencoded`.
pub fn encode_pairs(pairs: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}
