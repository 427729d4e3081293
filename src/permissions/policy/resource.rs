/*!
 * Resource Pattern Matcher
 * Extracts ID lists from `<tenant>:data.counting:<category>:<ids>` resources
 */

use regex::Regex;
use std::sync::LazyLock;

/// Resource category a policy string can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Layouts,
    Cities,
    Regions,
    Countries,
    Stores,
}

static LAYOUTS_RE: LazyLock<Regex> = LazyLock::new(|| category_regex("layouts"));
static CITIES_RE: LazyLock<Regex> = LazyLock::new(|| category_regex("cities"));
static REGIONS_RE: LazyLock<Regex> = LazyLock::new(|| category_regex("regions"));
static COUNTRIES_RE: LazyLock<Regex> = LazyLock::new(|| category_regex("countries"));
static STORES_RE: LazyLock<Regex> = LazyLock::new(|| category_regex("stores"));

fn category_regex(category: &str) -> Regex {
    Regex::new(&format!(r"(?m)[\*\w.]+:data\.counting:{category}:(\S+)"))
        .expect("static regex should not panic")
}

impl Category {
    fn regex(self) -> &'static Regex {
        match self {
            Category::Layouts => &*LAYOUTS_RE,
            Category::Cities => &*CITIES_RE,
            Category::Regions => &*REGIONS_RE,
            Category::Countries => &*COUNTRIES_RE,
            Category::Stores => &*STORES_RE,
        }
    }
}

/// Raw ID list of `category` in `resource`
///
/// When the category occurs more than once, the last occurrence wins.
/// Returns an empty string if the category is absent.
pub fn capture(resource: &str, category: Category) -> &str {
    category
        .regex()
        .captures_iter(resource)
        .last()
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str())
}
