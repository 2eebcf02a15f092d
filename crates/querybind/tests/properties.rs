//! Property tests for the binding chain.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use proptest::prelude::*;
use querybind::{BindError, Binder, ExtrasLimits, ParamKind, ParameterMap};

fn params_from(pairs: &[(String, String)]) -> ParameterMap {
    pairs.iter().cloned().collect()
}

proptest! {
    #[test]
    fn extras_never_exceed_bounds(
        pairs in prop::collection::vec(("[a-z_]{1,30}", ".{0,300}"), 0..20)
    ) {
        let params = params_from(&pairs);
        let limits = ExtrasLimits::default();
        let mut seen: Vec<(String, String)> = Vec::new();

        Binder::new(&params, &mut seen)
            .extras(|extras, s| *s = extras.into_iter().collect())
            .parse(|_| Ok(()))
            .unwrap();

        for (name, value) in &seen {
            prop_assert!(name.len() <= limits.max_name_len);
            prop_assert!(value.len() <= limits.max_value_len);
            prop_assert_eq!(params.get(name), Some(value.as_str()));
        }

        let expected = params
            .iter()
            .filter(|(name, values)| limits.admits(name, &values[0]))
            .count();
        prop_assert_eq!(seen.len(), expected);
    }

    #[test]
    fn claimed_names_never_appear_in_extras(
        pairs in prop::collection::vec(("[a-e]{1,3}", "[a-z0-9]{0,10}"), 0..15),
        claimed in prop::collection::vec("[a-e]{1,3}", 0..5)
    ) {
        let params = params_from(&pairs);
        let mut seen: Vec<String> = Vec::new();

        let mut binder = Binder::new(&params, &mut seen);
        for name in &claimed {
            binder = binder.register_param(name, ParamKind::String);
        }
        binder
            .extras(|extras, s| *s = extras.into_keys().collect())
            .parse(|_| Ok(()))
            .unwrap();

        for name in &seen {
            prop_assert!(!claimed.contains(name));
        }
    }

    #[test]
    fn tripped_chain_is_inert(name in "[a-z]{1,8}", value in "[a-z0-9]{1,8}") {
        let mut params = ParameterMap::new();
        params.set(name.clone(), value);
        let mut touched = false;

        let binder = Binder::new(&params, &mut touched)
            .validate(|_| Err(BindError::validation_failed("stop")))
            .string(&name, "", |_, t| *t = true)
            .int(&name, 0, |_, t| *t = true)
            .base64_string(&name, "", |_, t| *t = true)
            .ints(&[name.as_str()], &[0], |_, t| *t = true)
            .strings(&name, |_, t| *t = true)
            .raw(&name, |_, t| *t = true)
            .try_raw(&name, |_, t| {
                *t = true;
                Ok(())
            });

        prop_assert!(!binder.is_claimed(&name));
        prop_assert_eq!(binder.claimed().count(), 0);
        let err = binder.parse(|_| Ok(())).unwrap_err();
        prop_assert_eq!(err.message(), "stop");
        prop_assert!(!touched);
    }

    #[test]
    fn int_never_trips(raw in ".{0,24}", default in any::<i64>()) {
        let mut params = ParameterMap::new();
        params.set("n", raw.clone());
        let mut out = 0_i64;

        let binder = Binder::new(&params, &mut out).int("n", default, |v, o| *o = v);
        prop_assert!(!binder.has_error());
        binder.parse(|_| Ok(())).unwrap();

        let expected = raw.parse::<i64>().unwrap_or(default);
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn base64_string_round_trips(text in ".{1,64}") {
        let mut params = ParameterMap::new();
        params.set("b", STANDARD.encode(text.as_bytes()));
        let mut out = String::new();

        Binder::new(&params, &mut out)
            .base64_string("b", "", |v, o| *o = v)
            .parse(|_| Ok(()))
            .unwrap();

        prop_assert_eq!(out, text);
    }
}
