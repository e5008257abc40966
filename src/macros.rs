/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Handy for defaults that live in code rather than in a file.
///
/// ```rust
/// use serde_isc::{isc, Value};
///
/// let defaults = isc!({
///     "CGI": { "logdir": "/var/log/cgi" },
///     "RADIUS": { "server": { "port": 1812 }, "hosts": ["a", "b"] }
/// });
///
/// assert_eq!(defaults.lookup("RADIUS/server/port"), Some(&Value::Integer(1812)));
/// ```
#[macro_export]
macro_rules! isc {
    (empty) => {
        $crate::Value::Empty
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::isc!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::Map::new();
        $(
            map.insert($key.to_string(), $crate::isc!($value));
        )*
        $crate::Value::Map(map)
    }};

    // Integers and strings
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
