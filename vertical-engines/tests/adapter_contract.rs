//! Contract tests run against every adapter through the public registry.
//!
//! These exercise request building and response parsing with synthetic
//! provider payloads (no network calls).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use vertical_engines::{
    adapter, Category, Engine, EngineAdapter, EngineError, EngineResult, QueryParams, RawResponse,
    RequestSpec, ResultRecord, Template,
};

const MAP_ENGINES: &[(Engine, &str)] = &[
    (Engine::BaiduMaps, "https://map.baidu.com/search/"),
    (Engine::BingMaps, "https://www.bing.com/maps?q="),
    (Engine::GoogleMaps, "https://www.google.com/maps/search/"),
    (Engine::HereMaps, "https://wego.here.com/search/"),
    (Engine::YandexMaps, "https://yandex.com/maps/?text="),
];

fn records(results: &[EngineResult]) -> Vec<&ResultRecord> {
    results.iter().filter_map(EngineResult::as_record).collect()
}

fn bing_redirect(url: &str) -> String {
    format!(
        "https://www.bing.com/ck/a?!&amp;&amp;p=9e1d&amp;ptn=3&amp;u=a1{}&amp;ntb=1",
        URL_SAFE_NO_PAD.encode(url)
    )
}

#[test]
fn registry_round_trips_names() {
    for &engine in Engine::all() {
        let parsed: Engine = engine.name().parse().expect("known name");
        assert_eq!(parsed, engine);
        assert_eq!(adapter(engine).name(), engine.name());
    }
    assert!(matches!(
        "altavista_shopping".parse::<Engine>(),
        Err(EngineError::UnknownEngine(_))
    ));
}

#[test]
fn every_adapter_builds_an_https_url() {
    for &engine in Engine::all() {
        let spec = adapter(engine)
            .build_request("usb hub", &QueryParams::default())
            .expect("default params are always accepted");
        assert!(spec.url.starts_with("https://"), "{engine}: {}", spec.url);
        assert!(!spec.url.contains(' '), "{engine}: {}", spec.url);
    }
}

#[test]
fn adapters_extend_existing_headers_and_cookies() {
    for &engine in Engine::all() {
        let mut spec = RequestSpec::default();
        spec.headers.insert("X-Request-Id".into(), "42".into());
        spec.cookies.insert("session".into(), "abc".into());
        adapter(engine)
            .request("kettle", &QueryParams::default(), &mut spec)
            .expect("request");
        assert_eq!(spec.headers.get("X-Request-Id").map(String::as_str), Some("42"));
        assert_eq!(spec.cookies.get("session").map(String::as_str), Some("abc"));
    }
}

#[test]
fn largest_page_number_is_handled_without_panicking() {
    let params = QueryParams {
        pageno: u32::MAX,
        ..Default::default()
    };
    for &engine in Engine::all() {
        let spec = adapter(engine)
            .build_request("hub", &params)
            .expect("any page number builds a request");
        assert!(spec.url.starts_with("https://"), "{engine}: {}", spec.url);
    }

    let html = r#"<html><body><span class="sb_count">1-10 of 5 results</span>
        <ol id="b_results"><li class="b_algo"><h2><a href="https://a.example.com/">A</a></h2></li></ol>
        </body></html>"#;
    let resp = RawResponse::new(html).with_pageno(u32::MAX);
    let results = adapter(Engine::BingShopping).response(&resp).expect("past the end");
    assert!(results.is_empty());
}

#[test]
fn adapters_are_shareable_across_threads() {
    let handles: Vec<_> = Engine::all()
        .iter()
        .map(|&engine| {
            std::thread::spawn(move || {
                adapter(engine)
                    .build_request("thread", &QueryParams::default())
                    .map(|spec| spec.url)
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("thread").is_ok());
    }
}

// ── Maps ────────────────────────────────────────────────────────────────

#[test]
fn map_adapters_emit_one_deep_link() {
    let query = "Tour Eiffel, Paris";
    for &(engine, prefix) in MAP_ENGINES {
        let adapter = adapter(engine);
        assert!(adapter.info().categories.contains(&Category::Map));

        let resp = RawResponse::new("").with_query(query);
        let results = adapter.response(&resp).expect("map response");
        let recs = records(&results);
        assert_eq!(recs.len(), 1, "{engine}");

        let record = recs[0];
        assert_eq!(record.url, format!("{prefix}Tour%20Eiffel%2C%20Paris"));
        assert!(record.title.ends_with(": Tour Eiffel, Paris"), "{}", record.title);
        assert_eq!(record.template, Some(Template::Map));
        assert_eq!(record.address.as_ref().map(|a| a.name.as_str()), Some(query));
    }
}

#[test]
fn map_request_and_result_urls_agree() {
    for &(engine, _) in MAP_ENGINES {
        let adapter = adapter(engine);
        let spec = adapter
            .build_request("Brandenburger Tor", &QueryParams::default())
            .expect("request");
        let results = adapter
            .response(&RawResponse::new("").with_query("Brandenburger Tor"))
            .expect("response");
        assert_eq!(results[0].as_record().map(|r| r.url.as_str()), Some(spec.url.as_str()));
    }
}

#[test]
fn map_adapters_ignore_empty_query() {
    for &(engine, _) in MAP_ENGINES {
        let results = adapter(engine)
            .response(&RawResponse::new("<html></html>"))
            .expect("map response");
        assert!(results.is_empty(), "{engine}");
    }
}

// ── Baidu ───────────────────────────────────────────────────────────────

#[test]
fn baidu_drops_entries_without_url() {
    let body = r#"{"feed":{"entry":[
        {"title":"Kept","url":"https://item.jd.com/1.html","abs":"ok"},
        {"title":"Dropped","abs":"no link"}
    ]}}"#;
    let results = adapter(Engine::BaiduShopping)
        .response(&RawResponse::new(body))
        .expect("should parse");
    let recs = records(&results);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].title, "Kept");
}

#[test]
fn baidu_captcha_redirect_wins_over_body() {
    let resp = RawResponse::new("<html>not json at all")
        .with_status(302)
        .with_header(
            "location",
            "https://wappass.baidu.com/static/captcha/tuxing.html?ak=x",
        );
    let err = adapter(Engine::BaiduShopping)
        .response(&resp)
        .expect_err("captcha");
    assert!(matches!(err, EngineError::CaptchaDetected(_)));
}

#[test]
fn baidu_request_disables_redirects() {
    let spec = adapter(Engine::BaiduShopping)
        .build_request("茶具", &QueryParams::default())
        .expect("request");
    assert!(!spec.allow_redirects);
    assert!(spec.url.contains("tn=json"));
}

// ── Bing ────────────────────────────────────────────────────────────────

#[test]
fn bing_tile_links_are_unwrapped() {
    let target = "https://www.walmart.com/ip/Anker-USB-C-Hub/498123577?selected=true";
    let html = format!(
        r#"<html><body><span class="sb_count">1-1 of 3 results</span>
        <div class="iusc"><a href="{}">Anker USB-C Hub</a></div></body></html>"#,
        bing_redirect(target)
    );
    let results = adapter(Engine::BingShopping)
        .response(&RawResponse::new(html))
        .expect("should parse");
    let recs = records(&results);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].url, target);
    assert_eq!(results.last().and_then(EngineResult::number_of_results), Some(3));
}

#[test]
fn bing_fallback_returns_exactly_the_generic_results() {
    let organic: String = (1..=5)
        .map(|i| {
            format!(
                r#"<li class="b_algo"><h2><a href="https://store{i}.example.com/hub">Store {i} hubs</a></h2>
                <div class="b_caption"><p>Hubs at store {i}</p></div></li>"#
            )
        })
        .collect();
    let html = format!(
        r#"<html><body><span class="sb_count">1-5 of 5 results</span>
        <div class="iusc"><a href="https://th.bing.com/th?id=1"><img src="t.jpg"></a></div>
        <ol id="b_results">{organic}</ol></body></html>"#
    );
    let results = adapter(Engine::BingShopping)
        .response(&RawResponse::new(html))
        .expect("should parse");
    assert_eq!(records(&results).len(), 5);
}

#[test]
fn bing_pagination_checks() {
    let page = |banner: &str| {
        format!(
            r#"<html><body><span class="sb_count">{banner}</span>
            <ol id="b_results"><li class="b_algo"><h2><a href="https://a.example.com/">A</a></h2></li></ol>
            </body></html>"#
        )
    };
    let bing = adapter(Engine::BingShopping);

    let past_end = RawResponse::new(page("1-10 of 5 results")).with_pageno(3);
    assert!(bing.response(&past_end).expect("past end").is_empty());

    let wrong_page = RawResponse::new(page("1-10 of 50 results")).with_pageno(2);
    assert!(matches!(bing.response(&wrong_page), Err(EngineError::Protocol(_))));
}

#[test]
fn bing_unknown_time_range_is_rejected() {
    let params = QueryParams {
        time_range: Some("fortnight".into()),
        ..Default::default()
    };
    let err = adapter(Engine::BingShopping)
        .build_request("hub", &params)
        .expect_err("unknown range");
    assert!(matches!(err, EngineError::UnknownTimeRange(ref r) if r == "fortnight"));
}

// ── Google ──────────────────────────────────────────────────────────────

#[test]
fn google_fallback_returns_exactly_the_generic_results() {
    let items: String = (1..=5)
        .map(|i| {
            format!(
                r#"<div class="g"><div class="rc"><a href="https://merchant{i}.example.com/"><h3>Merchant {i}</h3></a></div></div>"#
            )
        })
        .collect();
    let html = format!("<html><body>{items}</body></html>");
    let results = adapter(Engine::GoogleShopping)
        .response(&RawResponse::new(html))
        .expect("should parse");
    let recs = records(&results);
    assert_eq!(recs.len(), 5);
    assert!(recs.iter().all(|r| r.template == Some(Template::Shopping)));
}

#[test]
fn time_range_handling_differs_per_adapter() {
    let params = QueryParams {
        time_range: Some("decade".into()),
        ..Default::default()
    };
    assert!(adapter(Engine::BaiduShopping).build_request("x", &params).is_ok());
    assert!(adapter(Engine::GoogleShopping).build_request("x", &params).is_ok());
    assert!(adapter(Engine::BingShopping).build_request("x", &params).is_err());
}

// ── Host JSON ───────────────────────────────────────────────────────────

#[test]
fn results_serialize_for_the_host() {
    let results = adapter(Engine::HereMaps)
        .response(&RawResponse::new("").with_query("Marienplatz"))
        .expect("response");
    let json = serde_json::to_value(&results).expect("serialize");
    assert_eq!(json[0]["template"], "map.html");
    assert_eq!(json[0]["address"]["name"], "Marienplatz");
    assert!(json[0].get("price").is_none());

    let count = serde_json::to_value(EngineResult::NumberOfResults {
        number_of_results: 7,
    })
    .expect("serialize");
    assert_eq!(count["number_of_results"], 7);
}
