//! Dockerfile synthesized for services that do not bring their own.

use kitgen_core::{File, FileRules};

use crate::discovery::DiscoveredService;

/// Multi-stage build: compile a static binary, ship it on alpine.
pub fn render(service: &str) -> String {
    format!(
        r#"FROM golang:alpine AS build-env

ARG VERSION=0.0.0
ARG SERVICE="{service}"

ENV CGO_ENABLED=0 GOOS=linux GOARCH=amd64

# cache dependencies first
WORKDIR /svc
COPY go.mod go.sum* /svc/
RUN go mod download

# lastly copy source, any change in source will not break above cache
COPY . /svc

RUN go build -a -ldflags="-s -w -X 'main.version=${{VERSION}}' -X 'main.name=${{SERVICE}}'" -o /app ./main.go

FROM alpine:3.11

WORKDIR /svc
COPY ./config/status.yml /svc/conf/status.yml
COPY --from=build-env /app /svc/app

ENV STATUS_PATH=/svc/conf/status.yml

ENTRYPOINT ["/svc/app"]
"#
    )
}

/// The Dockerfile for `service`, written only if absent.
pub fn file(service: &DiscoveredService) -> File {
    File::new(service.dockerfile_path(), render(&service.name)).with_rules(FileRules::if_missing())
}
