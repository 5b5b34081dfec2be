use cached::proc_macro::cached;
use opentelemetry::KeyValue;

pub fn add(name: &'static str, amount: u64, kv: &[(&str, &str)]) {
    counter(name).add(amount, &as_kvs(kv))
}

fn as_kvs(kv: &[(&str, &str)]) -> Vec<KeyValue> {
    kv.iter()
        .map(|(k, v)| KeyValue::new(k.to_string(), v.to_string()))
        .collect()
}

#[cached]
fn counter(name: &'static str) -> opentelemetry::metrics::Counter<u64> {
    opentelemetry::global::meter("comfort").u64_counter(name).build()
}
