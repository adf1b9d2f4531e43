use common::types::ServiceKind;

fn main() -> std::process::ExitCode {
    server::launch(ServiceKind::Read)
}
