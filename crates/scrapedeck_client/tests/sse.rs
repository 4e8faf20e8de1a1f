use pretty_assertions::assert_eq;
use scrapedeck_client::SseDecoder;

#[test]
fn decodes_events_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.push(b"data: {\"type\":\"lo").is_empty());
    assert!(decoder.push(b"g\"}\n").is_empty());
    assert_eq!(decoder.push(b"\n"), vec![r#"{"type":"log"}"#.to_string()]);
}

#[test]
fn handles_crlf_comments_and_other_fields() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b": keep-alive\r\nevent: message\r\nid: 7\r\ndata: one\r\n\r\ndata:two\r\n\r\n");
    assert_eq!(events, vec!["one".to_string(), "two".to_string()]);
}

#[test]
fn multi_line_data_is_joined_and_blank_events_skipped() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b"\n\ndata: a\ndata: b\n\nretry: 100\n\n");
    assert_eq!(events, vec!["a\nb".to_string()]);
}

#[test]
fn utf8_split_inside_a_character_survives() {
    let mut decoder = SseDecoder::new();
    let text = "data: caf\u{e9}\n\n".as_bytes();
    let (head, tail) = text.split_at(10);
    assert!(decoder.push(head).is_empty());
    assert_eq!(decoder.push(tail), vec!["caf\u{e9}".to_string()]);
}

#[test]
fn empty_data_events_are_not_dispatched() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.push(b"data:\n\n").is_empty());
    assert!(decoder.push(b"data: \r\n\r\n").is_empty());
    let events = decoder.push(b"data:\n\ndata: after\n\n");
    assert_eq!(events, vec!["after".to_string()]);
}
