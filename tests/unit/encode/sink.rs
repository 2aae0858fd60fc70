use super::*;

fn cfg(res: Resolution) -> SinkConfig {
    SinkConfig {
        path: PathBuf::from("mem.mp4"),
        codec_id: "mp4v".to_string(),
        fps: Fps::default(),
        resolution: res,
    }
}

struct FailingOpen;

impl FrameSink for FailingOpen {
    fn begin(&mut self, _cfg: SinkConfig) -> TripResult<()> {
        Err(TripError::writer_open("nope"))
    }
    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGB) -> TripResult<()> {
        unreachable!()
    }
    fn end(&mut self) -> TripResult<()> {
        panic!("end must not run when begin failed")
    }
}

#[test]
fn close_ends_once_and_reports_count() {
    let res = Resolution::new(4, 2).unwrap();
    let mut sink = InMemorySink::new();
    let mut open = OpenSink::open(&mut sink, cfg(res)).unwrap();
    open.write(&FrameRGB::black(res)).unwrap();
    open.write(&FrameRGB::black(res)).unwrap();
    assert_eq!(open.close().unwrap(), 2);

    assert_eq!(sink.end_calls(), 1);
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
}

#[test]
fn dropping_without_close_still_ends() {
    let res = Resolution::new(4, 2).unwrap();
    let mut sink = InMemorySink::counting();
    {
        let mut open = OpenSink::open(&mut sink, cfg(res)).unwrap();
        open.write(&FrameRGB::black(res)).unwrap();
    }
    assert_eq!(sink.end_calls(), 1);
    assert_eq!(sink.pushed(), 1);
    assert!(sink.frames().is_empty());
}

#[test]
fn mismatched_frame_is_rejected() {
    let res = Resolution::new(4, 2).unwrap();
    let mut sink = InMemorySink::counting();
    let mut open = OpenSink::open(&mut sink, cfg(res)).unwrap();
    let err = open
        .write(&FrameRGB::black(Resolution::new(2, 2).unwrap()))
        .unwrap_err();
    assert!(matches!(err, TripError::Encode(_)));
    assert_eq!(open.written(), 0);
}

#[test]
fn failed_open_does_not_end() {
    let mut sink = FailingOpen;
    let err = OpenSink::open(&mut sink, cfg(Resolution::default()))
        .err()
        .unwrap();
    assert!(matches!(err, TripError::WriterOpen(_)));
}
