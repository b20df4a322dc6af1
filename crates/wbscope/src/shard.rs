//! CDN shard routing for product images.
//!
//! Product images live on 32 `basket-NN` hosts. The host is picked from the
//! product's volume (`id / 100_000`) by a fixed table of inclusive upper
//! bounds; volumes past the last bound land on the final host.

/// Default CDN domain serving product images.
pub const CDN_DOMAIN: &str = "wbbasket.ru";

/// Inclusive upper volume bound for hosts 01..=31, ascending.
const HOST_BOUNDS: [u64; 31] = [
    143, 287, 431, 719, 1007, 1061, 1115, 1169, 1313, 1601, 1655, 1919, 2045, 2189, 2405, 2621,
    2837, 3053, 3269, 3485, 3701, 3917, 4133, 4349, 4565, 4877, 5189, 5501, 5813, 6125, 6437,
];

/// Host number for volumes above the last bound.
const OVERFLOW_HOST: u8 = 32;

/// Storage location of one product's images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardRoute {
    pub id: u64,
    pub volume: u64,
    pub part: u64,
    pub host: u8,
}

impl ShardRoute {
    /// Compute the route for a product identifier.
    pub fn for_product(id: u64) -> Self {
        let volume = id / 100_000;
        Self {
            id,
            volume,
            part: id / 1_000,
            host: host_for_volume(volume),
        }
    }

    /// Host number as it appears in the hostname ("01".."32").
    pub fn host_code(&self) -> String {
        format!("{:02}", self.host)
    }

    /// Directory holding this product's assets.
    pub fn base_url(&self, cdn_domain: &str) -> String {
        format!(
            "https://basket-{}.{cdn_domain}/vol{}/part{}/{}",
            self.host_code(),
            self.volume,
            self.part,
            self.id
        )
    }

    /// URL of the `n`-th full-size image (1-based).
    pub fn image_url(&self, cdn_domain: &str, n: u32) -> String {
        format!("{}/images/big/{n}.webp", self.base_url(cdn_domain))
    }
}

/// Host number (1..=32) serving the given volume.
pub fn host_for_volume(volume: u64) -> u8 {
    // partition_point counts bounds strictly below `volume`, which is the
    // zero-based index of the first range whose bound is >= volume.
    let idx = HOST_BOUNDS.partition_point(|&bound| bound < volume);
    if idx < HOST_BOUNDS.len() {
        idx as u8 + 1
    } else {
        OVERFLOW_HOST
    }
}

/// Image URLs on the default CDN domain.
pub fn image_urls(id: u64, image_count: u32) -> Vec<String> {
    image_urls_on(CDN_DOMAIN, id, image_count)
}

/// Image URLs `1..=image_count` for a product, in ascending order.
pub fn image_urls_on(cdn_domain: &str, id: u64, image_count: u32) -> Vec<String> {
    let route = ShardRoute::for_product(id);
    (1..=image_count)
        .map(|n| route.image_url(cdn_domain, n))
        .collect()
}
