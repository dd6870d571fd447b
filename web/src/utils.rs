use chrono::prelude::*;
use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Versioned `localStorage` key a type is persisted under.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault: Sized {
    fn local_or_default() -> Self;
}

impl<T: StorageKey + DeserializeOwned + Default> LocalOrDefault for T {
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_default()
    }
}

pub(crate) trait LocalSave {
    fn local_save(&self);
}

impl<T: StorageKey + Serialize> LocalSave for T {
    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("could not save {} to local storage: {:?}", T::KEY, err);
        }
    }
}

/// Stored value for `T`, if there is one and it still parses.
pub(crate) fn local_load<T: StorageKey + DeserializeOwned>() -> Option<T> {
    LocalStorage::get(T::KEY).ok()
}

pub(crate) fn local_delete<T: StorageKey>() {
    LocalStorage::delete(T::KEY);
}

pub(crate) fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        hits: u32,
    }

    impl StorageKey for Sample {
        const KEY: &'static str = "whacabol:test:sample";
    }

    #[wasm_bindgen_test]
    fn saved_value_loads_back() {
        local_delete::<Sample>();
        assert_eq!(local_load::<Sample>(), None);
        assert_eq!(Sample::local_or_default(), Sample::default());

        Sample { hits: 7 }.local_save();
        assert_eq!(local_load::<Sample>(), Some(Sample { hits: 7 }));

        local_delete::<Sample>();
        assert_eq!(local_load::<Sample>(), None);
    }

    #[wasm_bindgen_test]
    fn unparsable_value_falls_back_to_default() {
        LocalStorage::raw()
            .set_item(Sample::KEY, "not json")
            .unwrap();
        assert_eq!(Sample::local_or_default(), Sample::default());
        local_delete::<Sample>();
    }

    #[wasm_bindgen_test]
    fn clock_reads_current_time() {
        assert!(utc_now().timestamp_millis() > 0);
    }
}
