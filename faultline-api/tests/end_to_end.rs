//! Call sites returning codes, statuses and user errors
use faultline_api::prelude::*;

fn check_code(flag: bool) -> Code {
    verify!(flag);
    Code::Ok
}

fn forward_code(code: Code) -> Code {
    verify!(code);
    Code::Ok
}

#[test]
fn test_success_continues_and_failure_is_unknown() {
    assert_eq!(check_code(true), Code::Ok);
    assert_eq!(check_code(false), Code::Unknown);
}

#[test]
fn test_code_culprit_is_returned_unchanged() {
    assert_eq!(forward_code(Code::Ok), Code::Ok);
    assert_eq!(forward_code(Code::NotFound), Code::NotFound);
}

#[test]
fn test_status_culprit_is_returned_unchanged() {
    fn relay(status: Status) -> Status {
        verify!(status);
        Status::ok()
    }
    let original = Status::new(Code::PermissionDenied, "token expired");
    assert_eq!(relay(original.clone()), original);
    assert_eq!(relay(Status::ok()), Status::ok());
}

#[test]
fn test_status_fallback_message() {
    fn open(ready: bool) -> Result<(), Status> {
        verify!(ready, |b| b.error_code(Code::Unavailable).describe("opening db"));
        Ok(())
    }
    let err = open(false).unwrap_err();
    assert_eq!(err.code(), Code::Unavailable);
    let (location, rest) = err.message().split_once(": ").unwrap();
    assert!(location.contains("end_to_end.rs:"));
    assert_eq!(rest, "verify!(ready)\nopening db");
}

#[derive(Debug, Clone, PartialEq)]
struct DiskFull(u32);

impl Target for DiskFull {
    fn make_error(_: &dyn faultline_api::ErrorMaker) -> Self {
        DiskFull(0)
    }
}

fn reserve(blocks: u32) -> Result<u32, DiskFull> {
    if blocks > 8 {
        Err(DiskFull(blocks))
    } else {
        Ok(blocks)
    }
}

fn write(blocks: u32) -> Result<u32, DiskFull> {
    let reserved = attempt!(reserve(blocks));
    Ok(reserved * 512)
}

#[test]
fn test_user_error_passes_through() {
    assert_eq!(write(2), Ok(1024));
    assert_eq!(write(9), Err(DiskFull(9)));
}

#[test]
fn test_foreign_culprit_uses_target_impl() {
    fn first(items: &[u32]) -> Result<u32, DiskFull> {
        let item = attempt!(items.first().copied());
        Ok(item)
    }
    assert_eq!(first(&[]), Err(DiskFull(0)));
}

#[test]
fn test_forward_yields_whole_subject() {
    fn load(found: bool) -> Option<Option<&'static str>> {
        let whole = attempt!(in error_domain().forward(); found.then_some("row"));
        Some(whole)
    }
    assert_eq!(load(true), Some(Some("row")));
    assert_eq!(load(false), None);

    fn fresh(found: bool) -> Option<Option<&'static str>> {
        let whole = attempt!(in standard().forward(); found.then_some("row"));
        Some(whole)
    }
    assert_eq!(fresh(true), Some(Some("row")));
    assert_eq!(fresh(false), None);
}

#[test]
fn test_fault_builds_error_unconditionally() {
    fn lookup(key: &str) -> Result<String, Status> {
        if key.is_empty() {
            return fault!(|b| b.error_code(Code::InvalidArgument).describe("empty key"));
        }
        Ok(key.to_uppercase())
    }
    assert_eq!(lookup("id"), Ok("ID".to_string()));
    let err = lookup("").unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert!(err.message().ends_with(": empty key"));
}

#[test]
fn test_fault_without_description_names_the_macro() {
    fn never() -> Status {
        fault!(in standard().default_error_code(Code::Internal))
    }
    let status = never();
    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().ends_with(": fault!()"));
}

#[test]
fn test_explicit_domain_and_function_path() {
    use faultline_api::ErrorMaker;

    #[derive(Debug)]
    struct Where(&'static str, u32);

    impl Target for Where {
        fn make_error(maker: &dyn ErrorMaker) -> Self {
            let ctx = maker.context();
            Where(ctx.function, ctx.location.line)
        }
    }

    fn site() -> Where {
        verify!(in Domain::new(); false);
        Where("", 0)
    }
    let Where(function, line) = site();
    assert!(function.ends_with("test_explicit_domain_and_function_path::site"));
    assert!(line > 0);
}

#[derive(Debug, Clone, PartialEq)]
struct Quota {
    free: u64,
}

impl Target for Quota {
    fn make_error(_maker: &dyn faultline_api::ErrorMaker) -> Self {
        Quota { free: u64::MAX }
    }
}

fn claim(outcome: Result<(), Quota>, last: &mut Quota) -> Result<(), Quota> {
    let domain = Domain::new().with(passthrough());
    verify!(in domain; outcome, |b| {
        b.fill_error(last);
        b
    });
    Ok(())
}

fn claim_plain(outcome: Result<(), Quota>, last: &mut Quota) -> Result<(), Quota> {
    verify!(in Domain::new(); outcome, |b| {
        b.fill_error(last);
        b
    });
    Ok(())
}

#[test]
fn test_fill_error_passes_culprit_through_at_call_site() {
    let mut last = Quota { free: 1 };
    assert_eq!(claim(Ok(()), &mut last), Ok(()));
    assert_eq!(last, Quota { free: 1 });

    let full = Quota { free: 12 };
    assert_eq!(claim(Err(full.clone()), &mut last), Err(full.clone()));
    assert_eq!(last, full);
}

#[test]
fn test_fill_error_without_passthrough_uses_target() {
    let mut last = Quota { free: 1 };
    let returned = claim_plain(Err(Quota { free: 12 }), &mut last);
    assert_eq!(returned, Err(Quota { free: u64::MAX }));
    assert_eq!(last, Quota { free: u64::MAX });
}
