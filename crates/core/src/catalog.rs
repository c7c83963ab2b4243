use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Number of items shown per page, both for server-side and client-side pagination.
pub const PAGE_SIZE: usize = 20;

/// Default base URL of the PokeAPI REST service.
pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2/";

/// Default base URL for official artwork images.
pub const DEFAULT_ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/";

static POKEMON_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/pokemon/(\d+)/?$").expect("pokemon id pattern is valid"));

static TYPE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/type/(\d+)/?$").expect("type id pattern is valid"));

/// Named API resource as returned by PokeAPI (`{ name, url }`)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Response of `GET pokemon?offset=N`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListingResponse {
    pub count: u64,
    pub results: Vec<NamedResource>,
}

/// Response of `GET type`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TypeListResponse {
    pub results: Vec<NamedResource>,
}

/// Slot entry inside a type detail response
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TypePokemonSlot {
    pub pokemon: NamedResource,
}

/// Response of `GET type/{id}`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TypeDetailResponse {
    pub id: u32,
    pub pokemon: Vec<TypePokemonSlot>,
}

/// A category facet (a Pokémon type).
///
/// `value` is absent when the identifier could not be read from the source URL.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Facet {
    pub name: String,
    pub value: Option<u32>,
}

/// A catalog entry (a Pokémon).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
    pub id: Option<u32>,
}

impl Item {
    pub fn new(name: impl Into<String>, id: Option<u32>) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }

    fn from_resource(resource: &NamedResource) -> Self {
        Self::new(resource.name.clone(), extract_pokemon_id(&resource.url))
    }
}

/// Every item tagged with a single facet.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FacetItems {
    pub facet: u32,
    pub items: Vec<Item>,
}

/// One server-side page of the unfiltered listing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    pub count: u64,
    pub items: Vec<Item>,
}

impl ListingPage {
    /// The result an inert listing fetch reports.
    pub fn empty() -> Self {
        Self::default()
    }
}

fn capture_id(re: &Regex, url: &str) -> Option<u32> {
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
}

/// Extract the numeric id from a `.../pokemon/{id}/` URL
pub fn extract_pokemon_id(url: &str) -> Option<u32> {
    capture_id(&POKEMON_ID_RE, url)
}

/// Extract the numeric id from a `.../type/{id}/` URL
pub fn extract_type_id(url: &str) -> Option<u32> {
    capture_id(&TYPE_ID_RE, url)
}

/// Transform the type list response into facets
pub fn transform_types(response: TypeListResponse) -> Vec<Facet> {
    response
        .results
        .into_iter()
        .map(|t| Facet {
            value: extract_type_id(&t.url),
            name: t.name,
        })
        .collect()
}

/// Transform a listing response into a typed page
pub fn transform_listing(response: ListingResponse) -> ListingPage {
    ListingPage {
        count: response.count,
        items: response.results.iter().map(Item::from_resource).collect(),
    }
}

/// Transform a type detail response into the items tagged with it
pub fn transform_type_detail(response: TypeDetailResponse) -> FacetItems {
    FacetItems {
        facet: response.id,
        items: response
            .pokemon
            .iter()
            .map(|slot| Item::from_resource(&slot.pokemon))
            .collect(),
    }
}

/// Relative request path for a page of the unfiltered listing.
///
/// The first page uses the bare endpoint, which the source pages by `PAGE_SIZE` already.
pub fn listing_path(page: usize) -> String {
    if page == 0 {
        "pokemon".to_string()
    } else {
        format!(
            "pokemon?offset={}&limit={PAGE_SIZE}",
            page.saturating_mul(PAGE_SIZE)
        )
    }
}

/// Relative request path for the facet catalog
pub fn types_path() -> &'static str {
    "type"
}

/// Relative request path for a single facet's items
pub fn type_detail_path(facet: u32) -> String {
    format!("type/{facet}")
}

/// Artwork image URL for an item, if its id is known
pub fn artwork_url(base: &str, id: Option<u32>) -> Option<String> {
    id.map(|id| {
        if base.ends_with('/') {
            format!("{base}{id}.png")
        } else {
            format!("{base}/{id}.png")
        }
    })
}

/// Resolve a user-provided facet reference (name or numeric value) against the catalog
pub fn resolve_facet(facets: &[Facet], reference: &str) -> Option<u32> {
    let reference = reference.trim();
    if let Ok(value) = reference.parse::<u32>() {
        return facets
            .iter()
            .filter_map(|f| f.value)
            .find(|v| *v == value);
    }

    facets
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(reference))
        .and_then(|f| f.value)
}

/// Look up a facet name by value
pub fn facet_name(facets: &[Facet], value: u32) -> Option<&str> {
    facets
        .iter()
        .find(|f| f.value == Some(value))
        .map(|f| f.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(name: &str, url: &str) -> NamedResource {
        NamedResource {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_extract_pokemon_id() {
        assert_eq!(
            extract_pokemon_id("https://pokeapi.co/api/v2/pokemon/25/"),
            Some(25)
        );
        assert_eq!(
            extract_pokemon_id("https://pokeapi.co/api/v2/pokemon/10034"),
            Some(10034)
        );
    }

    #[test]
    fn test_extract_pokemon_id_absent() {
        assert_eq!(extract_pokemon_id("https://pokeapi.co/api/v2/pokemon/"), None);
        assert_eq!(extract_pokemon_id("https://pokeapi.co/api/v2/type/10/"), None);
        assert_eq!(extract_pokemon_id("not a url"), None);
        assert_eq!(extract_pokemon_id("https://pokeapi.co/api/v2/pokemon/25abc/"), None);
        assert_eq!(
            extract_pokemon_id("https://pokeapi.co/api/v2/pokemon/12/forms/"),
            None
        );
    }

    #[test]
    fn test_extract_pokemon_id_overflow_is_absent() {
        assert_eq!(
            extract_pokemon_id("https://pokeapi.co/api/v2/pokemon/99999999999/"),
            None
        );
    }

    #[test]
    fn test_extract_type_id() {
        assert_eq!(extract_type_id("https://pokeapi.co/api/v2/type/10/"), Some(10));
        assert_eq!(extract_type_id("https://pokeapi.co/api/v2/pokemon/10/"), None);
        assert_eq!(extract_type_id("https://pokeapi.co/api/v2/type/10x/"), None);
        assert_eq!(extract_type_id("https://pokeapi.co/api/v2/type/10/pokemon/"), None);
    }

    #[test]
    fn test_transform_types() {
        let response = TypeListResponse {
            results: vec![
                resource("normal", "https://pokeapi.co/api/v2/type/1/"),
                resource("broken", "https://pokeapi.co/api/v2/type/x/"),
            ],
        };

        let facets = transform_types(response);

        assert_eq!(
            facets,
            vec![
                Facet {
                    name: "normal".to_string(),
                    value: Some(1)
                },
                Facet {
                    name: "broken".to_string(),
                    value: None
                },
            ]
        );
    }

    #[test]
    fn test_transform_listing_from_json() {
        let json = r#"{
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon?offset=20&limit=20",
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        }"#;
        let response: ListingResponse = serde_json::from_str(json).unwrap();

        let page = transform_listing(response);

        assert_eq!(page.count, 1302);
        assert_eq!(page.items[0], Item::new("bulbasaur", Some(1)));
        assert_eq!(page.items[1], Item::new("ivysaur", Some(2)));
    }

    #[test]
    fn test_transform_type_detail_from_json() {
        let json = r#"{
            "id": 10,
            "name": "fire",
            "pokemon": [
                {"pokemon": {"name": "charmander", "url": "https://pokeapi.co/api/v2/pokemon/4/"}, "slot": 1},
                {"pokemon": {"name": "charizard", "url": "https://pokeapi.co/api/v2/pokemon/6/"}, "slot": 1}
            ]
        }"#;
        let response: TypeDetailResponse = serde_json::from_str(json).unwrap();

        let facet_items = transform_type_detail(response);

        assert_eq!(facet_items.facet, 10);
        assert_eq!(
            facet_items.items,
            vec![
                Item::new("charmander", Some(4)),
                Item::new("charizard", Some(6))
            ]
        );
    }

    #[test]
    fn test_listing_path() {
        assert_eq!(listing_path(0), "pokemon");
        assert_eq!(listing_path(1), "pokemon?offset=20&limit=20");
        assert_eq!(listing_path(3), "pokemon?offset=60&limit=20");
    }

    #[test]
    fn test_type_detail_path() {
        assert_eq!(type_detail_path(10), "type/10");
    }

    #[test]
    fn test_artwork_url() {
        assert_eq!(
            artwork_url(DEFAULT_ARTWORK_BASE, Some(25)).unwrap(),
            format!("{DEFAULT_ARTWORK_BASE}25.png")
        );
        assert_eq!(
            artwork_url("https://img.example", Some(1)).unwrap(),
            "https://img.example/1.png"
        );
        assert_eq!(artwork_url(DEFAULT_ARTWORK_BASE, None), None);
    }

    #[test]
    fn test_resolve_facet() {
        let facets = vec![
            Facet {
                name: "fire".to_string(),
                value: Some(10),
            },
            Facet {
                name: "flying".to_string(),
                value: Some(3),
            },
            Facet {
                name: "unknown".to_string(),
                value: None,
            },
        ];

        assert_eq!(resolve_facet(&facets, "fire"), Some(10));
        assert_eq!(resolve_facet(&facets, "FLYING"), Some(3));
        assert_eq!(resolve_facet(&facets, "3"), Some(3));
        assert_eq!(resolve_facet(&facets, "99"), None);
        assert_eq!(resolve_facet(&facets, "unknown"), None);
        assert_eq!(resolve_facet(&facets, "water"), None);
        assert_eq!(facet_name(&facets, 10), Some("fire"));
        assert_eq!(facet_name(&facets, 11), None);
    }
}
