//! Provider adapters.
//!
//! Each module provides a struct implementing [`crate::engine::EngineAdapter`]
//! for one provider vertical. [`adapter`] maps an [`Engine`] to its
//! stateless instance.

pub mod baidu_maps;
pub mod baidu_shopping;
pub mod bing_maps;
pub mod bing_shopping;
pub mod google_maps;
pub mod google_shopping;
pub mod here_maps;
mod map_link;
pub mod yandex_maps;

pub use baidu_maps::BaiduMapsEngine;
pub use baidu_shopping::BaiduShoppingEngine;
pub use bing_maps::BingMapsEngine;
pub use bing_shopping::BingShoppingEngine;
pub use google_maps::GoogleMapsEngine;
pub use google_shopping::GoogleShoppingEngine;
pub use here_maps::HereMapsEngine;
pub use yandex_maps::YandexMapsEngine;

use crate::engine::EngineAdapter;
use crate::types::Engine;

/// The adapter registered for `engine`.
pub fn adapter(engine: Engine) -> &'static dyn EngineAdapter {
    match engine {
        Engine::BaiduMaps => &BaiduMapsEngine,
        Engine::BingMaps => &BingMapsEngine,
        Engine::GoogleMaps => &GoogleMapsEngine,
        Engine::HereMaps => &HereMapsEngine,
        Engine::YandexMaps => &YandexMapsEngine,
        Engine::BaiduShopping => &BaiduShoppingEngine,
        Engine::BingShopping => &BingShoppingEngine,
        Engine::GoogleShopping => &GoogleShoppingEngine,
    }
}
