//! Route Table
//!
//! Turns an ordered list of [`RouteDescriptor`]s into an immutable table of
//! resolved entries. Each entry carries its parsed path pattern and the shared
//! lazy loader for its view.
//!
//! Construction checks the table invariants:
//!
//! - the table is not empty
//! - names are unique
//! - exactly one `*` fallback exists, and it is the last entry
//! - every path parses
//! - props-forwarding routes only capture params their view accepts, and
//!   capture every prop their view requires
//!
//! Matching is first-match in table order; the fallback catches the rest.

use serde::Serialize;
use std::collections::HashMap;

use crate::routes::descriptor::{default_routes, RouteDescriptor};
use crate::routes::error::{RouteError, RouteResult};
use crate::routes::location::{normalize_base, Location};
use crate::routes::pattern::{Params, PathPattern};
use crate::views::{ViewId, ViewLoader, ViewRegistry};

/// A resolved table entry
#[derive(Debug, Clone)]
pub struct RouteEntry {
    descriptor: RouteDescriptor,
    pattern: PathPattern,
    loader: ViewLoader,
}

impl RouteEntry {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn path(&self) -> &str {
        &self.descriptor.path
    }

    pub fn view(&self) -> ViewId {
        self.descriptor.view
    }

    pub fn forwards_props(&self) -> bool {
        self.descriptor.props
    }

    pub fn is_fallback(&self) -> bool {
        self.descriptor.is_fallback()
    }

    pub fn descriptor(&self) -> &RouteDescriptor {
        &self.descriptor
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Deferred loader for this entry's view
    pub fn loader(&self) -> &ViewLoader {
        &self.loader
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            name: self.name().to_string(),
            path: self.path().to_string(),
            view: self.view(),
            props: self.forwards_props(),
            fallback: self.is_fallback(),
            loaded: self.loader.is_loaded(),
        }
    }
}

/// Serializable view of an entry
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub name: String,
    pub path: String,
    pub view: ViewId,
    pub props: bool,
    pub fallback: bool,
    pub loaded: bool,
}

/// Result of matching a location against the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// Name of the matched route
    pub name: String,
    pub view: ViewId,
    /// Position of the matched entry in the table
    pub index: usize,
    pub location: Location,
    pub params: Params,
    /// Params forwarded as view props, when the route forwards them
    pub props: Option<Params>,
    /// True when the fallback route matched
    pub fallback: bool,
}

/// Options applied to every match
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Compare static segments case-sensitively
    pub case_sensitive: bool,
    /// Prefix stripped from every URL before matching
    pub base: String,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            base: "/".to_string(),
        }
    }
}

/// Immutable, validated route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    by_name: HashMap<String, usize>,
    registry: ViewRegistry,
    options: MatchOptions,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Build a table with default options
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = RouteDescriptor>,
    ) -> RouteResult<Self> {
        Self::builder().routes(descriptors).build()
    }

    /// The application's own table
    pub fn default_table() -> RouteResult<Self> {
        Self::from_descriptors(default_routes())
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RouteEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// The `*` entry
    pub fn fallback(&self) -> Option<&RouteEntry> {
        self.entries.last().filter(|e| e.is_fallback())
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Base path every URL is resolved against
    pub fn base(&self) -> &str {
        &self.options.base
    }

    /// Resolve a URL (path, optional query and hash) to a route
    pub fn resolve(&self, url: &str) -> RouteResult<RouteMatch> {
        self.match_location(Location::parse(url, &self.options.base))
    }

    /// Match an already parsed location
    pub fn match_location(&self, location: Location) -> RouteResult<RouteMatch> {
        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(params) = entry
                .pattern
                .matches(&location.path, self.options.case_sensitive)
            {
                tracing::debug!(
                    route = %entry.name(),
                    path = %location.path,
                    "Route matched"
                );
                return Ok(self.build_match(index, entry, location, params));
            }
        }

        Err(RouteError::NoMatch(location.path))
    }

    /// Resolve a named route with explicit params
    pub fn resolve_named(&self, name: &str, params: &Params) -> RouteResult<RouteMatch> {
        let index = *self
            .by_name
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        let entry = &self.entries[index];

        let path = self.path_for(name, params)?;
        let location = Location::parse(&path, "/");
        let accepted = entry.pattern.param_names();
        let params: Params = params
            .iter()
            .filter(|(k, _)| accepted.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(self.build_match(index, entry, location, params))
    }

    /// Path (relative to the base) for a named route
    pub fn path_for(&self, name: &str, params: &Params) -> RouteResult<String> {
        let entry = self
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        entry
            .pattern
            .interpolate(params)
            .map_err(|param| RouteError::MissingParam {
                route: name.to_string(),
                param,
            })
    }

    fn build_match(
        &self,
        index: usize,
        entry: &RouteEntry,
        location: Location,
        params: Params,
    ) -> RouteMatch {
        RouteMatch {
            name: entry.name().to_string(),
            view: entry.view(),
            index,
            location,
            props: entry.forwards_props().then(|| params.clone()),
            params,
            fallback: entry.is_fallback(),
        }
    }
}

/// Builder for [`RouteTable`]
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    descriptors: Vec<RouteDescriptor>,
    options: MatchOptions,
    registry: Option<ViewRegistry>,
}

impl RouteTableBuilder {
    /// Append one route
    pub fn route(mut self, descriptor: RouteDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Append several routes, keeping their order
    pub fn routes(mut self, descriptors: impl IntoIterator<Item = RouteDescriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.options.case_sensitive = case_sensitive;
        self
    }

    pub fn base(mut self, base: &str) -> Self {
        self.options.base = normalize_base(base);
        self
    }

    /// Use a custom set of view loaders
    pub fn registry(mut self, registry: ViewRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Validate and resolve the table. No view loader runs here.
    pub fn build(self) -> RouteResult<RouteTable> {
        if self.descriptors.is_empty() {
            return Err(RouteError::EmptyTable);
        }

        let registry = self.registry.unwrap_or_default();
        let mut entries = Vec::with_capacity(self.descriptors.len());
        let mut by_name = HashMap::with_capacity(self.descriptors.len());
        let mut fallback: Option<(usize, String)> = None;

        for (index, descriptor) in self.descriptors.into_iter().enumerate() {
            let pattern = PathPattern::parse(&descriptor.path)?;

            if by_name.insert(descriptor.name.clone(), index).is_some() {
                return Err(RouteError::DuplicateName(descriptor.name));
            }

            if descriptor.is_fallback() {
                if let Some((_, first)) = &fallback {
                    return Err(RouteError::MultipleFallbacks {
                        first: first.clone(),
                        second: descriptor.name,
                    });
                }
                fallback = Some((index, descriptor.name.clone()));
            }

            if descriptor.props {
                check_props(&descriptor, &pattern)?;
            }

            let loader = registry.get(descriptor.view).clone();
            entries.push(RouteEntry {
                descriptor,
                pattern,
                loader,
            });
        }

        match fallback {
            None => return Err(RouteError::MissingFallback),
            Some((index, name)) if index + 1 != entries.len() => {
                return Err(RouteError::FallbackNotLast(name));
            }
            Some(_) => {}
        }

        tracing::info!(
            routes = entries.len(),
            base = %self.options.base,
            "Route table built"
        );

        Ok(RouteTable {
            entries,
            by_name,
            registry,
            options: self.options,
        })
    }
}

fn check_props(descriptor: &RouteDescriptor, pattern: &PathPattern) -> RouteResult<()> {
    let view = descriptor.view;
    let mismatch = |reason: String| RouteError::PropsMismatch {
        route: descriptor.name.clone(),
        reason,
    };

    for param in pattern.param_names() {
        if !view.accepted_props().contains(&param) {
            return Err(mismatch(format!(
                "view {} does not accept prop '{}'",
                view, param
            )));
        }
    }

    let required = pattern.required_params();
    for prop in view.required_props() {
        if !required.contains(prop) {
            return Err(mismatch(format!(
                "path has no required param ':{}' for view {}",
                prop, view
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_table() -> RouteTable {
        RouteTable::from_descriptors(vec![
            RouteDescriptor::new("home", "/", ViewId::Home),
            RouteDescriptor::new("user", "/users/:id", ViewId::User).forward_props(),
            RouteDescriptor::new("notFound", "*", ViewId::NotFound),
        ])
        .unwrap()
    }

    #[test]
    fn test_scenario_user_route() {
        let table = scenario_table();
        let matched = table.resolve("/users/7").unwrap();
        assert_eq!(matched.name, "user");
        assert!(!matched.fallback);
        assert_eq!(matched.params.get("id").map(String::as_str), Some("7"));
    }

    #[test]
    fn test_each_route_resolves_to_its_name() {
        let table = RouteTable::default_table().unwrap();
        assert_eq!(table.resolve("/").unwrap().name, "home");
        assert_eq!(table.resolve("").unwrap().name, "home");
        assert_eq!(table.resolve("/users/1").unwrap().name, "user");
    }

    #[test]
    fn test_resolve_with_url_in_query() {
        let table = RouteTable::default_table().unwrap();
        let matched = table
            .resolve("/users/7?next=https://example.com/login")
            .unwrap();
        assert_eq!(matched.name, "user");
        assert_eq!(matched.params["id"], "7");
        assert_eq!(
            matched.location.query_value("next"),
            Some("https://example.com/login")
        );
    }

    #[test]
    fn test_unmatched_goes_to_fallback() {
        let table = RouteTable::default_table().unwrap();
        for path in ["/nope", "/users", "/users/1/extra", "/a/b/c"] {
            let matched = table.resolve(path).unwrap();
            assert_eq!(matched.name, "notFound", "path {}", path);
            assert_eq!(matched.view, ViewId::NotFound);
            assert!(matched.fallback);
            assert!(matched.props.is_none());
        }
    }

    #[test]
    fn test_props_forwarding() {
        let table = RouteTable::default_table().unwrap();
        let matched = table.resolve("/users/42?tab=profile").unwrap();
        let props = matched.props.expect("user route forwards props");
        assert_eq!(props.get("id").map(String::as_str), Some("42"));

        let home = table.resolve("/").unwrap();
        assert!(home.props.is_none());
    }

    #[test]
    fn test_build_does_not_load_views() {
        let table = RouteTable::default_table().unwrap();
        for entry in table.entries() {
            assert!(!entry.loader().is_loaded());
            assert_eq!(entry.loader().load_count(), 0);
        }
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = RouteTable::from_descriptors(vec![
            RouteDescriptor::new("home", "/", ViewId::Home),
            RouteDescriptor::new("home", "/again", ViewId::Home),
            RouteDescriptor::new("notFound", "*", ViewId::NotFound),
        ])
        .unwrap_err();
        assert_eq!(err, RouteError::DuplicateName("home".to_string()));
    }

    #[test]
    fn test_fallback_rules() {
        let missing = RouteTable::from_descriptors(vec![RouteDescriptor::new(
            "home",
            "/",
            ViewId::Home,
        )])
        .unwrap_err();
        assert_eq!(missing, RouteError::MissingFallback);

        let not_last = RouteTable::from_descriptors(vec![
            RouteDescriptor::new("notFound", "*", ViewId::NotFound),
            RouteDescriptor::new("home", "/", ViewId::Home),
        ])
        .unwrap_err();
        assert_eq!(not_last, RouteError::FallbackNotLast("notFound".to_string()));

        let twice = RouteTable::from_descriptors(vec![
            RouteDescriptor::new("a", "*", ViewId::NotFound),
            RouteDescriptor::new("b", "*", ViewId::NotFound),
        ])
        .unwrap_err();
        assert!(matches!(twice, RouteError::MultipleFallbacks { .. }));

        assert_eq!(
            RouteTable::from_descriptors(Vec::new()).unwrap_err(),
            RouteError::EmptyTable
        );
    }

    #[test]
    fn test_props_mismatch_rejected() {
        let wrong_param = RouteTable::from_descriptors(vec![
            RouteDescriptor::new("user", "/users/:uid", ViewId::User).forward_props(),
            RouteDescriptor::new("notFound", "*", ViewId::NotFound),
        ])
        .unwrap_err();
        assert!(matches!(wrong_param, RouteError::PropsMismatch { .. }));

        let optional = RouteTable::from_descriptors(vec![
            RouteDescriptor::new("user", "/users/:id?", ViewId::User).forward_props(),
            RouteDescriptor::new("notFound", "*", ViewId::NotFound),
        ])
        .unwrap_err();
        assert!(matches!(optional, RouteError::PropsMismatch { .. }));

        // Without forwarding the view reads params itself
        assert!(RouteTable::from_descriptors(vec![
            RouteDescriptor::new("user", "/users/:uid", ViewId::User),
            RouteDescriptor::new("notFound", "*", ViewId::NotFound),
        ])
        .is_ok());
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = RouteTable::from_descriptors(vec![
            RouteDescriptor::new("users", "users", ViewId::Home),
            RouteDescriptor::new("notFound", "*", ViewId::NotFound),
        ])
        .unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::from_descriptors(vec![
            RouteDescriptor::new("me", "/users/me", ViewId::Home),
            RouteDescriptor::new("user", "/users/:id", ViewId::User).forward_props(),
            RouteDescriptor::new("notFound", "*", ViewId::NotFound),
        ])
        .unwrap();
        assert_eq!(table.resolve("/users/me").unwrap().name, "me");
        assert_eq!(table.resolve("/users/you").unwrap().name, "user");
    }

    #[test]
    fn test_base_and_case() {
        let table = RouteTable::builder()
            .routes(default_routes())
            .base("/app/")
            .build()
            .unwrap();
        assert_eq!(table.base(), "/app");
        assert_eq!(table.resolve("/app/users/3").unwrap().name, "user");
        assert_eq!(table.resolve("/app").unwrap().name, "home");

        let strict = RouteTable::builder()
            .route(RouteDescriptor::new("about", "/About", ViewId::Home))
            .route(RouteDescriptor::new("notFound", "*", ViewId::NotFound))
            .case_sensitive(true)
            .build()
            .unwrap();
        assert_eq!(strict.resolve("/about").unwrap().name, "notFound");
    }

    #[test]
    fn test_named_resolution() {
        let table = RouteTable::default_table().unwrap();
        let mut params = Params::new();
        params.insert("id".to_string(), "9".to_string());

        assert_eq!(table.path_for("user", &params).unwrap(), "/users/9");
        assert_eq!(table.path_for("home", &Params::new()).unwrap(), "/");

        let matched = table.resolve_named("user", &params).unwrap();
        assert_eq!(matched.name, "user");
        assert_eq!(matched.location.path, "/users/9");

        assert_eq!(
            table.path_for("user", &Params::new()).unwrap_err(),
            RouteError::MissingParam {
                route: "user".to_string(),
                param: "id".to_string()
            }
        );
        assert!(matches!(
            table.path_for("nope", &params),
            Err(RouteError::UnknownRoute(_))
        ));
    }

    #[test]
    fn test_fallback_captures_path() {
        let table = RouteTable::default_table().unwrap();
        let matched = table.resolve("/missing/page").unwrap();
        assert_eq!(matched.params["pathMatch"], "/missing/page");
        assert_eq!(table.fallback().unwrap().name(), "notFound");
    }
}
