/// Builds a [`Value::Map`](crate::Value::Map) from `key => value` pairs.
///
/// Values go through `Value::from`, so literals, strings, vectors and nested `map!`s all work.
///
/// ```
/// use infill_core::{Value, map};
///
/// let input = map! {
///     "name" => "Ann",
///     "address" => map! { "city" => "Metropolis" },
///     "tags" => vec!["a", "b"],
/// };
/// assert_eq!(input.as_map().unwrap().len(), 3);
/// assert!(matches!(map! {}, Value::Map(m) if m.is_empty()));
/// ```
#[macro_export]
macro_rules! map {
    () => {
        $crate::Value::Map($crate::Map::new())
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert($key, $crate::Value::from($value));
        )+
        $crate::Value::Map(map)
    }};
}
